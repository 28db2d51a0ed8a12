//! User-facing transient notifications

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, state::TimerId};

/// A fire-and-forget message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Notification {
    TimerCreated { id: TimerId, name: String },
    HalfwayReached { id: TimerId, name: String },
    TimerCompleted { id: TimerId, name: String },
    ValidationFailed { message: String },
}

impl Notification {
    /// Text shown to the user
    pub fn message(&self) -> String {
        match self {
            Notification::TimerCreated { .. } => "Timer created!".to_string(),
            Notification::HalfwayReached { name, .. } => format!("{} is halfway done!", name),
            Notification::TimerCompleted { name, .. } => format!("{} is completed!", name),
            Notification::ValidationFailed { message } => message.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::ValidationFailed { .. })
    }
}

impl From<&ValidationError> for Notification {
    fn from(error: &ValidationError) -> Self {
        Notification::ValidationFailed {
            message: error.to_string(),
        }
    }
}
