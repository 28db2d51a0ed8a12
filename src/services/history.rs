//! Read-only views over timers and completion history

use serde::{Deserialize, Serialize};

use crate::{state::Timer, utils::format_duration};

/// File name offered for history downloads
pub const HISTORY_EXPORT_FILE_NAME: &str = "timer_history.json";

/// Totals shown above the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_completed: usize,
    /// Sum of the completed timers' durations
    pub total_seconds: u64,
    pub total_minutes: u64,
    /// `total_seconds` as `HH:MM:SS`
    pub total_formatted: String,
}

impl HistorySummary {
    pub fn from_history(history: &[Timer]) -> Self {
        // Stored snapshots do not bound durations, so the total saturates
        let total_seconds = history
            .iter()
            .map(|timer| timer.duration)
            .fold(0u64, u64::saturating_add);
        Self {
            total_completed: history.len(),
            total_seconds,
            total_minutes: total_seconds / 60,
            total_formatted: format_duration(total_seconds),
        }
    }
}

/// Timers sharing one display category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub timers: Vec<Timer>,
}

/// Group timers by display category, in order of first appearance
pub fn group_by_category(timers: &[Timer]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for timer in timers {
        let category = timer.display_category();
        match groups.iter_mut().find(|group| group.category == category) {
            Some(group) => group.timers.push(timer.clone()),
            None => groups.push(CategoryGroup {
                category: category.to_string(),
                timers: vec![timer.clone()],
            }),
        }
    }
    groups
}

/// Pretty-printed JSON array of the history entries
pub fn export_history(history: &[Timer]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(name: &str, category: &str, duration: u64) -> Timer {
        Timer::new(name, category, duration)
    }

    #[test]
    fn summary_of_empty_history() {
        let summary = HistorySummary::from_history(&[]);
        assert_eq!(summary.total_completed, 0);
        assert_eq!(summary.total_seconds, 0);
        assert_eq!(summary.total_formatted, "00:00:00");
    }

    #[test]
    fn summary_totals_durations() {
        let history = [
            timer("Pomodoro", "Work", 1500),
            timer("Tea", "Break", 300),
            timer("Plank", "Exercise", 45),
        ];
        let summary = HistorySummary::from_history(&history);
        assert_eq!(summary.total_completed, 3);
        assert_eq!(summary.total_seconds, 1845);
        assert_eq!(summary.total_minutes, 30);
        assert_eq!(summary.total_formatted, "00:30:45");
    }

    #[test]
    fn summary_of_oversized_stored_history_saturates() {
        use crate::persistence::{MemorySlot, StatePersistence, StateSlot, STATE_KEY};
        use std::sync::Arc;

        let raw = format!(
            r#"{{
                "timers": [],
                "history": [
                    {{"id": "a", "name": "Huge", "category": "Work", "duration": {max},
                      "remaining": 0, "status": "finished", "halfwayAlertTriggered": true,
                      "createdAt": "2024-06-10T06:13:20.000Z"}},
                    {{"id": "b", "name": "Tea", "category": "Break", "duration": 5,
                      "remaining": 0, "status": "finished", "halfwayAlertTriggered": true,
                      "createdAt": "2024-06-10T06:20:00.000Z"}}
                ]
            }}"#,
            max = u64::MAX
        );
        let slot = Arc::new(MemorySlot::new());
        slot.write(STATE_KEY, &raw).unwrap();
        let state = StatePersistence::new(slot).load().unwrap();

        let summary = HistorySummary::from_history(&state.history);
        assert_eq!(summary.total_completed, 2);
        assert_eq!(summary.total_seconds, u64::MAX);
        assert_eq!(summary.total_minutes, u64::MAX / 60);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let timers = [
            timer("a", "Work", 1),
            timer("b", "Break", 1),
            timer("c", "Work", 1),
            timer("d", "", 1),
        ];
        let groups = group_by_category(&timers);
        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, ["Work", "Break", "Uncategorized"]);
        assert_eq!(groups[0].timers.len(), 2);
        assert_eq!(groups[0].timers[1].name, "c");
        // the stored category itself stays empty
        assert_eq!(groups[2].timers[0].category, "");
    }

    #[test]
    fn export_is_pretty_printed_array() {
        let history = [timer("Tea", "Break", 300)];
        let json = export_history(&history).unwrap();
        assert!(json.starts_with("[\n"));
        assert!(json.contains("\"halfwayAlertTriggered\": false"));

        let parsed: Vec<Timer> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history);
    }
}
