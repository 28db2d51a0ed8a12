//! Durable key-value slots

use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::debug;

use crate::error::PersistenceError;

/// A key-value slot holding serialized snapshots
pub trait StateSlot: Debug + Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as `<key>.json` inside a directory
#[derive(Debug, Clone)]
pub struct FileSlot {
    base_path: PathBuf,
}

impl FileSlot {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}

impl StateSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored snapshot at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.base_path)?;

        // Rename over the old file so a crash never leaves a half-written snapshot
        let path = self.path_for(key);
        let tmp_path = self.base_path.join(format!(".{key}.json.tmp"));
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Process-local slot; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let values = self
            .values
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
