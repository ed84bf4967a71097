//! Errors raised by individual attribute fetches
//!
//! These never fail a collection run. The collector turns them into a
//! `Failed` entry whose reason is the error's display text.

use thiserror::Error;

/// Failure of a single attribute source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The attribute cannot be queried on the current platform
    #[error("not supported on this platform: {0}")]
    Unsupported(String),

    /// The platform query ran but produced no usable answer
    #[error("platform query failed: {0}")]
    Query(String),

    /// Reading a system file or spawning a probe failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The background task that ran a blocking probe did not complete
    #[error("background fetch task failed: {0}")]
    Task(String),
}

impl SourceError {
    pub fn query(message: impl Into<String>) -> Self {
        SourceError::Query(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        SourceError::Unsupported(message.into())
    }
}

impl From<tokio::task::JoinError> for SourceError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_panic() {
            SourceError::Task("blocking probe panicked".to_string())
        } else {
            SourceError::Task("blocking probe was cancelled".to_string())
        }
    }
}
