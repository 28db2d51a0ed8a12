//! Configuration and CLI argument handling

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::persistence::{FileSlot, StatePersistence};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "timer-board")]
#[command(about = "A state-managed HTTP server for named countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the stored timer state
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep timer state in memory only
    #[arg(long, conflicts_with = "data_dir")]
    pub in_memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Directory for the durable slot, defaulting to the platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("timer-board")
        })
    }

    /// Build the persistence adapter selected by the flags
    pub fn persistence(&self) -> StatePersistence {
        if self.in_memory {
            StatePersistence::in_memory()
        } else {
            StatePersistence::new(Arc::new(FileSlot::new(self.data_dir())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["timer-board"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert!(!config.in_memory);
        assert!(config.data_dir().ends_with("timer-board"));
    }

    #[test]
    fn explicit_data_dir_and_verbose() {
        let config = Config::try_parse_from([
            "timer-board",
            "--data-dir",
            "/tmp/timers",
            "-v",
            "--port",
            "8080",
        ])
        .unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/timers"));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn in_memory_conflicts_with_data_dir() {
        assert!(Config::try_parse_from(["timer-board", "--in-memory", "--data-dir", "/tmp/x"]).is_err());
    }
}
