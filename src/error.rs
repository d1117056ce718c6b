//! Error types for scratchsql.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for scratchsql operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScratchError {
    /// Query execution errors (syntax errors, missing tables, empty batches, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Directory access or navigation errors.
    #[error("Directory error: {0}")]
    Directory(String),

    /// An execution was requested while another one is still running.
    #[error("A query is already running")]
    Busy,

    /// Clipboard errors (no backend, copy failed).
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Configuration errors (invalid config file, bad CLI values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal setup, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScratchError {
    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a directory error with the given message.
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }

    /// Creates a clipboard error with the given message.
    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Query(_) => "Query Error",
            Self::Directory(_) => "Directory Error",
            Self::Busy => "Busy",
            Self::Clipboard(_) => "Clipboard Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the underlying message without the category prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Query(msg)
            | Self::Directory(msg)
            | Self::Clipboard(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Busy => self.to_string(),
        }
    }
}

/// Result type alias using ScratchError.
pub type Result<T> = std::result::Result<T, ScratchError>;
