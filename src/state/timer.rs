//! Timer entity structure

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque timer identifier, stable for the timer's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TimerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TimerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Countdown status of a single timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Paused,
    Running,
    Finished,
}

/// One user-created countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    pub category: String,
    /// Total countdown length in seconds
    pub duration: u64,
    /// Seconds left, always within `0..=duration`
    pub remaining: u64,
    pub status: TimerStatus,
    /// Set once the countdown reaches the halfway mark, cleared by reset
    pub halfway_alert_triggered: bool,
    /// Creation time as stored by the client, carried unchanged into history.
    /// New timers use RFC 3339; stored values are kept verbatim.
    pub created_at: String,
}

impl Timer {
    /// Create a paused timer with a fresh id and a full countdown
    pub fn new(name: impl Into<String>, category: impl Into<String>, duration: u64) -> Self {
        Self::with_id(
            TimerId::generate(),
            name,
            category,
            duration,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }

    /// Create a paused timer with an explicit id and creation time
    pub fn with_id(
        id: TimerId,
        name: impl Into<String>,
        category: impl Into<String>,
        duration: u64,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            duration,
            remaining: duration,
            status: TimerStatus::Paused,
            halfway_alert_triggered: false,
            created_at: created_at.into(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Remaining seconds at which the halfway alert belongs (floor division)
    pub fn halfway_mark(&self) -> u64 {
        self.duration / 2
    }

    /// Category used for grouping; empty categories fall back to "Uncategorized"
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            "Uncategorized"
        } else {
            &self.category
        }
    }
}
