//! Command vocabulary accepted by the timer store

use super::{Timer, TimerId, TimersState};

/// Every mutation of [`TimersState`] is expressed as one of these commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append an already validated, freshly identified timer
    Create(Timer),
    Start(TimerId),
    Pause(TimerId),
    Reset(TimerId),
    Delete(TimerId),
    /// Decrement a running timer by one second
    Tick(TimerId),
    ClearHistory,
    /// Wholesale substitution, used when loading from storage
    ReplaceState(TimersState),
}

impl Command {
    /// Short action name used for last-action tracking and logs
    pub fn action(&self) -> &'static str {
        match self {
            Command::Create(_) => "create",
            Command::Start(_) => "start",
            Command::Pause(_) => "pause",
            Command::Reset(_) => "reset",
            Command::Delete(_) => "delete",
            Command::Tick(_) => "tick",
            Command::ClearHistory => "clear-history",
            Command::ReplaceState(_) => "replace-state",
        }
    }
}
