//! Core error types for daymark-core.
//!
//! This module defines the error hierarchy using thiserror. Boundary
//! operations return these instead of panicking; nothing in the core is
//! fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daymark-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable-storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backup codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Backup import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable-storage errors.
///
/// Callers that receive one of these must treat the operation as not
/// applied: the store rolls its in-memory state back before surfacing it.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Schema migration failed
    #[error("Storage migration failed: {0}")]
    MigrationFailed(String),

    /// Reading a key failed
    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing a key failed
    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Removing a key failed
    #[error("Failed to remove key '{key}': {message}")]
    RemoveFailed { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A date string did not match `YYYY-MM-DD` or named no real day
    #[error("Invalid date '{0}': expected a real calendar date as YYYY-MM-DD")]
    InvalidDate(String),

    /// A month string did not match `YYYY-MM`
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),
}

/// Backup codec errors.
///
/// Decoding can fail on any byte of foreign input; encoding cannot fail.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The ciphertext was not valid base64
    #[error("Backup data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded bytes were not valid UTF-8
    #[error("Decoded backup is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Backup import errors. Surfaced to the user; the store is never
/// mutated when one of these is returned.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be decoded by the obfuscation codec
    #[error("Backup file could not be decoded: {0}")]
    Decode(#[from] CodecError),

    /// The decoded payload was not valid JSON
    #[error("Backup file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed but does not look like a backup snapshot
    #[error("Backup file has an unexpected shape: {0}")]
    Shape(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
