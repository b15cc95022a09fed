//! Error types for chronolint.
//!
//! The analysis core itself is infallible: everything it cannot model
//! degrades to the Unknown tag and is silently skipped. Errors exist only
//! at the driver boundary (I/O, grammar loading, configuration).

use thiserror::Error;

/// Main error type for chronolint operations
#[derive(Debug, Error)]
pub enum ChronolintError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChronolintError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        ChronolintError::Parse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ChronolintError::Config(msg.into())
    }
}

/// Result type alias for chronolint operations
pub type Result<T> = std::result::Result<T, ChronolintError>;
