//! State management module
//!
//! The timer entity, the command vocabulary, the pure transition function
//! over the aggregate state, and the store that owns the live state.

pub mod app_state;
pub mod command;
pub mod timer;
pub mod timers_state;

// Re-export main types
pub use app_state::AppState;
pub use command::Command;
pub use timer::{Timer, TimerId, TimerStatus};
pub use timers_state::TimersState;
