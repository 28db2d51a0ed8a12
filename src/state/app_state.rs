//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{Command, TimerId, TimersState};
use crate::{
    error::CommandError,
    persistence::StatePersistence,
    services::{NewTimer, Notification},
};

/// The timer store: owns the current state and applies every command to it
#[derive(Debug)]
pub struct AppState {
    /// Current aggregate state
    timers_state: Arc<Mutex<TimersState>>,
    /// Durable mirror of the state
    persistence: StatePersistence,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Arc<Mutex<Option<String>>>,
    last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest snapshot after every transition
    snapshot_tx: watch::Sender<TimersState>,
    /// User-facing notifications
    notification_tx: broadcast::Sender<Notification>,
}

impl AppState {
    /// Create a store holding the empty initial state
    pub fn new(port: u16, host: String, persistence: StatePersistence) -> Self {
        let (snapshot_tx, _) = watch::channel(TimersState::new());
        let (notification_tx, _) = broadcast::channel(100);

        Self {
            timers_state: Arc::new(Mutex::new(TimersState::new())),
            persistence,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            notification_tx,
        }
    }

    /// Restore the stored snapshot, keeping the empty state if there is none
    pub fn init(&self) -> Result<TimersState, CommandError> {
        match self.persistence.load() {
            Some(stored) => {
                info!(
                    "Restored {} active timers and {} history entries",
                    stored.timers.len(),
                    stored.history.len()
                );
                self.dispatch(Command::ReplaceState(stored))
            }
            None => {
                info!("No stored timer state, starting empty");
                self.snapshot()
            }
        }
    }

    pub fn persistence(&self) -> &StatePersistence {
        &self.persistence
    }

    /// Apply one command and publish the resulting snapshot
    pub fn dispatch(&self, command: Command) -> Result<TimersState, CommandError> {
        self.dispatch_all([command])
    }

    /// Apply commands in order under one lock acquisition
    pub fn dispatch_all<I>(&self, commands: I) -> Result<TimersState, CommandError>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut state = self.timers_state.lock()
            .map_err(|e| CommandError::LockPoisoned(e.to_string()))?;

        let mut last_action = None;
        for command in commands {
            debug!("Applying {} command", command.action());
            last_action = Some(command.action());
            let current = std::mem::take(&mut *state);
            *state = current.apply(command);
        }

        let Some(action) = last_action else {
            return Ok(state.clone());
        };

        let new_state = state.clone();
        self.snapshot_tx.send_replace(new_state.clone());
        drop(state); // Release the lock early

        if let Ok(mut last) = self.last_action.lock() {
            *last = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(new_state)
    }

    /// Validate creation input and append the new timer.
    ///
    /// Rejected input raises a validation notification and issues no command.
    pub fn create_timer(&self, input: &NewTimer) -> Result<TimersState, CommandError> {
        let timer = match input.validate() {
            Ok(timer) => timer,
            Err(e) => {
                warn!("Rejected timer creation: {}", e);
                self.notify(Notification::from(&e));
                return Err(e.into());
            }
        };

        info!("Creating timer '{}' ({}s) in {}", timer.name, timer.duration, timer.category);
        let notification = Notification::TimerCreated {
            id: timer.id.clone(),
            name: timer.name.clone(),
        };
        let new_state = self.dispatch(Command::Create(timer))?;
        self.notify(notification);
        Ok(new_state)
    }

    pub fn start(&self, id: TimerId) -> Result<TimersState, CommandError> {
        self.dispatch(Command::Start(id))
    }

    pub fn pause(&self, id: TimerId) -> Result<TimersState, CommandError> {
        self.dispatch(Command::Pause(id))
    }

    pub fn reset(&self, id: TimerId) -> Result<TimersState, CommandError> {
        self.dispatch(Command::Reset(id))
    }

    pub fn delete(&self, id: TimerId) -> Result<TimersState, CommandError> {
        self.dispatch(Command::Delete(id))
    }

    pub fn tick(&self, id: TimerId) -> Result<TimersState, CommandError> {
        self.dispatch(Command::Tick(id))
    }

    pub fn clear_history(&self) -> Result<TimersState, CommandError> {
        info!("Clearing timer history");
        self.dispatch(Command::ClearHistory)
    }

    /// Start every active timer
    pub fn start_all(&self) -> Result<TimersState, CommandError> {
        self.dispatch_for_each(Command::Start)
    }

    /// Pause every active timer
    pub fn pause_all(&self) -> Result<TimersState, CommandError> {
        self.dispatch_for_each(Command::Pause)
    }

    /// Delete every active timer; history is kept
    pub fn delete_all(&self) -> Result<TimersState, CommandError> {
        self.dispatch_for_each(Command::Delete)
    }

    fn dispatch_for_each<F>(&self, command: F) -> Result<TimersState, CommandError>
    where
        F: Fn(TimerId) -> Command,
    {
        let ids: Vec<TimerId> = self
            .snapshot()?
            .timers
            .into_iter()
            .map(|timer| timer.id)
            .collect();
        self.dispatch_all(ids.into_iter().map(command))
    }

    /// Get the current aggregate state
    pub fn snapshot(&self) -> Result<TimersState, CommandError> {
        self.timers_state.lock()
            .map(|state| state.clone())
            .map_err(|e| CommandError::LockPoisoned(e.to_string()))
    }

    /// Watch the snapshot published after every transition
    pub fn subscribe(&self) -> watch::Receiver<TimersState> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notification_tx.subscribe()
    }

    /// Publish a notification; having nobody listening is not an error
    pub fn notify(&self, notification: Notification) {
        if self.notification_tx.send(notification).is_err() {
            debug!("No notification listeners");
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ValidationError,
        state::{Timer, TimerStatus},
    };

    fn store() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), StatePersistence::in_memory())
    }

    fn create(state: &AppState, name: &str, duration: u64) -> TimerId {
        let snapshot = state
            .create_timer(&NewTimer::new(name, "Work", duration))
            .unwrap();
        snapshot.timers.last().unwrap().id.clone()
    }

    #[test]
    fn init_restores_stored_snapshot() {
        let persistence = StatePersistence::in_memory();
        let stored = TimersState::new().apply(Command::Create(Timer::new("Tea", "Break", 60)));
        persistence.save(&stored).unwrap();

        let state = AppState::new(0, "127.0.0.1".to_string(), persistence);
        assert_eq!(state.init().unwrap(), stored);
        assert_eq!(*state.subscribe().borrow(), stored);
    }

    #[test]
    fn init_without_snapshot_starts_empty() {
        let state = store();
        assert_eq!(state.init().unwrap(), TimersState::new());
        assert_eq!(state.get_last_action().0, None);
    }

    #[test]
    fn create_notifies_and_records_action() {
        let state = store();
        let mut notifications = state.subscribe_notifications();

        let id = create(&state, "Pomodoro", 5);

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.timers.len(), 1);
        assert_eq!(snapshot.timers[0].remaining, 5);
        assert_eq!(
            notifications.try_recv().unwrap(),
            Notification::TimerCreated { id, name: "Pomodoro".to_string() }
        );
        assert_eq!(state.get_last_action().0.as_deref(), Some("create"));
    }

    #[test]
    fn invalid_input_issues_no_command() {
        let state = store();
        let mut notifications = state.subscribe_notifications();
        let before = state.subscribe();

        let err = state
            .create_timer(&NewTimer::new("", "Work", 10))
            .unwrap_err();
        assert!(matches!(err, CommandError::Validation(ValidationError::EmptyName)));
        assert!(state.snapshot().unwrap().timers.is_empty());
        assert!(!before.has_changed().unwrap());
        assert!(notifications.try_recv().unwrap().is_error());
    }

    #[test]
    fn every_transition_is_published() {
        let state = store();
        let mut rx = state.subscribe();
        let id = create(&state, "Tea", 3);
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        state.start(id.clone()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().timers[0].status, TimerStatus::Running);
    }

    #[test]
    fn bulk_commands_cover_all_active_timers() {
        let state = store();
        create(&state, "a", 10);
        create(&state, "b", 10);

        let started = state.start_all().unwrap();
        assert!(started.timers.iter().all(|t| t.status == TimerStatus::Running));

        let paused = state.pause_all().unwrap();
        assert!(paused.timers.iter().all(|t| t.status == TimerStatus::Paused));

        let deleted = state.delete_all().unwrap();
        assert!(deleted.timers.is_empty());
    }

    #[test]
    fn bulk_command_on_empty_state_changes_nothing() {
        let state = store();
        let rx = state.subscribe();
        assert_eq!(state.start_all().unwrap(), TimersState::new());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn ticking_to_zero_moves_timer_to_history() {
        let state = store();
        let id = create(&state, "Plank", 2);
        state.start(id.clone()).unwrap();
        state.tick(id.clone()).unwrap();
        let finished = state.tick(id.clone()).unwrap();

        assert!(finished.timers.is_empty());
        assert_eq!(finished.history.len(), 1);

        let cleared = state.clear_history().unwrap();
        assert!(cleared.history.is_empty());
    }

    #[test]
    fn uptime_is_formatted() {
        assert!(store().get_uptime().ends_with('s'));
    }
}
