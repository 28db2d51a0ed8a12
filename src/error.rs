//! Error types for the timer board

use crate::state::TimerId;

/// Rejected timer creation input; the message is shown to the user as-is
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a timer name")]
    EmptyName,

    #[error("Please enter a category")]
    EmptyCategory,

    #[error("Duration must be greater than 0")]
    ZeroDuration,

    #[error("Duration cannot exceed 24 hours")]
    DurationTooLong,
}

/// A snapshot that parsed but breaks the aggregate invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("duplicate active timer id {0}")]
    DuplicateId(TimerId),

    #[error("finished timer {0} is still in the active set")]
    FinishedInActiveSet(TimerId),

    #[error("timer {id} has remaining {remaining}s above its duration {duration}s")]
    RemainingExceedsDuration {
        id: TimerId,
        remaining: u64,
        duration: u64,
    },
}

/// Durable storage errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the slot failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot decoded but is not a valid state.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] InvariantViolation),

    /// The slot's internal lock was poisoned.
    #[error("storage slot unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the command surface
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Creation input was rejected before any command was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to lock timer state: {0}")]
    LockPoisoned(String),
}
