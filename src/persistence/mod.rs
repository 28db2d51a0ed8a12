//! Persistence module
//!
//! Snapshots the full timer state into a durable key-value slot and restores
//! it on startup. Corrupted snapshots are logged and discarded.

pub mod slot;

use std::sync::Arc;

use tracing::{debug, warn};

pub use slot::{FileSlot, MemorySlot, StateSlot};

use crate::{error::PersistenceError, state::TimersState};

/// Fixed key the aggregate state is stored under
pub const STATE_KEY: &str = "timers_state";

/// Serializes [`TimersState`] to and from a [`StateSlot`]
#[derive(Debug, Clone)]
pub struct StatePersistence {
    slot: Arc<dyn StateSlot>,
}

impl StatePersistence {
    pub fn new(slot: Arc<dyn StateSlot>) -> Self {
        Self { slot }
    }

    /// Persistence backed by a process-local slot
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlot::new()))
    }

    /// Write the full snapshot
    pub fn save(&self, state: &TimersState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(state)?;
        self.slot.write(STATE_KEY, &json)?;
        debug!(
            "Saved snapshot: {} active, {} in history",
            state.timers.len(),
            state.history.len()
        );
        Ok(())
    }

    /// Read the stored snapshot, `Ok(None)` if none was ever saved
    pub fn try_load(&self) -> Result<Option<TimersState>, PersistenceError> {
        let Some(json) = self.slot.read(STATE_KEY)? else {
            return Ok(None);
        };

        let state: TimersState = serde_json::from_str(&json)?;
        state.check_invariants()?;
        Ok(Some(state))
    }

    /// Read the stored snapshot, logging and discarding unreadable data
    pub fn load(&self) -> Option<TimersState> {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                warn!("Discarding stored timer state: {}", e);
                None
            }
        }
    }
}
