//! Error types for the store uptime reporting system
//!
//! This module defines the error types used throughout the crate. The main
//! error type is `UptimeError`. Store-local data problems (missing timezone,
//! missing business hours, malformed intervals) are recovered where they occur
//! and never reach this type; what remains here aborts a whole report run.

use thiserror::Error;

/// Main error type for the store uptime reporting system
#[derive(Error, Debug)]
pub enum UptimeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// The storage collaborator could not be reached. Fatal for the run.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unknown or unexpected error
    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

/// Result type alias for operations that can fail with an [UptimeError]
pub type Result<T> = std::result::Result<T, UptimeError>;

impl UptimeError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        UptimeError::InvalidInput(msg.into())
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        UptimeError::NotFound(what.into())
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        UptimeError::StorageError(msg.into())
    }

    /// Create a new storage unavailable error
    pub fn storage_unavailable<S: Into<String>>(msg: S) -> Self {
        UptimeError::StorageUnavailable(msg.into())
    }

    /// Whether this error means the backing store could not be read at all.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, UptimeError::StorageUnavailable(_))
    }
}

impl From<&str> for UptimeError {
    fn from(s: &str) -> Self {
        UptimeError::invalid_input(s)
    }
}

impl From<String> for UptimeError {
    fn from(s: String) -> Self {
        UptimeError::invalid_input(s)
    }
}

impl From<tokio::task::JoinError> for UptimeError {
    fn from(err: tokio::task::JoinError) -> Self {
        UptimeError::Unknown(format!("Worker task error: {}", err))
    }
}
