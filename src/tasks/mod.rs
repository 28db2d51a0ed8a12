//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod background;
pub mod notification_sink;
pub mod persistence_writer;
pub mod tick_driver;

// Re-export main functions
pub use background::BackgroundTasks;
pub use notification_sink::notification_sink_task;
pub use persistence_writer::persistence_writer_task;
pub use tick_driver::{tick_driver_task, TICK_INTERVAL};
