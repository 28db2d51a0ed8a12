//! Persistence writer background task

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::state::{AppState, TimersState};

/// Background task that mirrors every published snapshot into storage.
///
/// Bursts of transitions collapse into one write of the latest snapshot.
/// A failed write is logged and retried implicitly by the next transition.
/// The latest snapshot is flushed once more when `shutdown` is cancelled.
pub async fn persistence_writer_task(state: Arc<AppState>, shutdown: CancellationToken) {
    info!("Starting persistence writer task");

    let mut snapshot_rx = state.subscribe();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    debug!("Snapshot channel closed");
                    break;
                }
                let snapshot = snapshot_rx.borrow_and_update().clone();
                write_snapshot(&state, &snapshot);
            }
        }
    }

    let snapshot = snapshot_rx.borrow().clone();
    write_snapshot(&state, &snapshot);
    info!("Persistence writer stopped after final flush");
}

fn write_snapshot(state: &AppState, snapshot: &TimersState) {
    if let Err(e) = state.persistence().save(snapshot) {
        error!("Failed to persist timer state: {}", e);
    }
}
