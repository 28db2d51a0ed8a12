//! Timer Board - A state-managed HTTP server for named countdown timers
//!
//! This library provides the timer store (a pure transition function over
//! active timers and completion history), its durable persistence, the
//! once-per-second tick driver, and an HTTP command surface.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod persistence;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Command, Timer, TimerId, TimerStatus, TimersState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
