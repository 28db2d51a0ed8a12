//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimersState;

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: TimersState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: TimersState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            state,
        }
    }

    /// Create a response for an applied command
    pub fn ok(message: impl Into<String>, state: TimersState) -> Self {
        Self::new("ok".to_string(), message.into(), state)
    }

    /// Create an error response
    pub fn error(message: impl Into<String>, state: TimersState) -> Self {
        Self::new("error".to_string(), message.into(), state)
    }
}

/// Status response with store metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub active_timers: usize,
    pub running_timers: usize,
    pub history_entries: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
