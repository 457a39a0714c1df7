//! Error types for the settings store.

use std::path::PathBuf;
use thiserror::Error;

/// Settings file and accessor errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("Failed to write config file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    SerializeFailed(String),

    #[error("Config contains errors; writes are suspended until they are resolved")]
    WritesSuspended,

    #[error("Invalid value for '{key}'. Expected: {expected}")]
    InvalidValue { key: String, expected: String },

    #[error("Shortcut '{sequence}' is reserved and cannot be rebound")]
    ShortcutReserved { sequence: String },

    #[error("Shortcut '{sequence}' is already bound to '{other}'")]
    ShortcutConflict { sequence: String, other: String },
}

/// Settings file watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to watch '{path}': {message}")]
    WatchFailed { path: PathBuf, message: String },

    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}
