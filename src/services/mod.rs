//! Services module
//!
//! Input validation, notifications and read-only views used by the command
//! surface around the timer store.

pub mod history;
pub mod notifications;
pub mod validation;

pub use history::*;
pub use notifications::Notification;
pub use validation::*;
