//! Validation of user-supplied timer creation input

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, state::Timer};

/// Longest allowed countdown: 24 hours
pub const MAX_DURATION_SECS: u64 = 86_400;

/// Timer creation request as entered by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimer {
    pub name: String,
    pub category: String,
    /// Countdown length in seconds
    pub duration: u64,
}

impl NewTimer {
    pub fn new(name: impl Into<String>, category: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            duration,
        }
    }

    /// Check the input and build a fresh paused timer with trimmed text fields
    pub fn validate(&self) -> Result<Timer, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        if self.duration == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if self.duration > MAX_DURATION_SECS {
            return Err(ValidationError::DurationTooLong);
        }

        Ok(Timer::new(name, category, self.duration))
    }
}

/// Combine hour/minute/second form fields into seconds.
///
/// Each field is clamped the way the entry form clamps it: hours to 23,
/// minutes and seconds to 59.
pub fn duration_from_parts(hours: u64, minutes: u64, seconds: u64) -> u64 {
    hours.min(23) * 3600 + minutes.min(59) * 60 + seconds.min(59)
}
