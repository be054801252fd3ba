mod config;
mod memory;
mod sqlite;

pub use config::{Config, ExportConfig, UiConfig};
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable string key-value storage behind the check-in store.
///
/// Synchronous by contract; absence of a key stands for an empty
/// collection. The store takes one of these by value, so tests can run
/// against [`MemoryStorage`] without touching real persistent storage.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/daymark[-dev]/` based on DAYMARK_ENV.
///
/// Set DAYMARK_ENV=dev to use the development data directory, or
/// DAYMARK_DATA_DIR to point somewhere else entirely (tests use this to
/// stay out of the real one).
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    if let Ok(dir) = std::env::var("DAYMARK_DATA_DIR") {
        if !dir.is_empty() {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
            return Ok(dir);
        }
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYMARK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daymark-dev")
    } else {
        base_dir.join("daymark")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
