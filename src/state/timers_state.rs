//! Aggregate timer state and its transition function

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Command, Timer, TimerId, TimerStatus};
use crate::error::InvariantViolation;

/// Aggregate root: the active timers plus the completion history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimersState {
    /// Active timers in creation order, unique by id
    pub timers: Vec<Timer>,
    /// Completed timers in completion order
    pub history: Vec<Timer>,
}

impl TimersState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an active timer by id
    pub fn timer(&self, id: &TimerId) -> Option<&Timer> {
        self.timers.iter().find(|timer| &timer.id == id)
    }

    /// Iterate over the active timers that are currently counting down
    pub fn running(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter().filter(|timer| timer.is_running())
    }

    /// Apply one command and return the resulting state.
    ///
    /// Commands that target an id not present in `timers` leave the state
    /// unchanged. A tick that brings `remaining` to zero marks the timer
    /// finished and moves it to the tail of `history` in the same step.
    pub fn apply(mut self, command: Command) -> Self {
        match command {
            Command::Create(timer) => {
                if self.timer(&timer.id).is_some() {
                    debug!("Ignoring create for duplicate timer id {}", timer.id);
                } else {
                    self.timers.push(timer);
                }
            }
            Command::Start(id) => self.update(&id, |timer| timer.status = TimerStatus::Running),
            Command::Pause(id) => self.update(&id, |timer| timer.status = TimerStatus::Paused),
            Command::Reset(id) => self.update(&id, |timer| {
                timer.remaining = timer.duration;
                timer.status = TimerStatus::Paused;
                timer.halfway_alert_triggered = false;
            }),
            Command::Delete(id) => self.timers.retain(|timer| timer.id != id),
            Command::Tick(id) => self.tick(&id),
            Command::ClearHistory => self.history.clear(),
            Command::ReplaceState(state) => return state,
        }
        self
    }

    fn update<F>(&mut self, id: &TimerId, updater: F)
    where
        F: FnOnce(&mut Timer),
    {
        if let Some(timer) = self.timers.iter_mut().find(|timer| &timer.id == id) {
            updater(timer);
        }
    }

    fn tick(&mut self, id: &TimerId) {
        let Some(index) = self.timers.iter().position(|timer| &timer.id == id) else {
            return;
        };

        let timer = &mut self.timers[index];
        if !timer.is_running() {
            return;
        }

        timer.remaining = timer.remaining.saturating_sub(1);
        if !timer.halfway_alert_triggered && timer.remaining == timer.halfway_mark() {
            timer.halfway_alert_triggered = true;
        }

        if timer.remaining == 0 {
            let mut finished = self.timers.remove(index);
            finished.status = TimerStatus::Finished;
            self.history.push(finished);
        }
    }

    /// Verify the aggregate invariants, used to reject malformed snapshots
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::new();
        for timer in &self.timers {
            if !seen.insert(&timer.id) {
                return Err(InvariantViolation::DuplicateId(timer.id.clone()));
            }
            if timer.status == TimerStatus::Finished {
                return Err(InvariantViolation::FinishedInActiveSet(timer.id.clone()));
            }
        }

        for timer in self.timers.iter().chain(&self.history) {
            if timer.remaining > timer.duration {
                return Err(InvariantViolation::RemainingExceedsDuration {
                    id: timer.id.clone(),
                    remaining: timer.remaining,
                    duration: timer.duration,
                });
            }
        }

        Ok(())
    }
}
