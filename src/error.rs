//! Error types for the feed.

use std::time::Duration;
use thiserror::Error;

/// Main error type for feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Long-poll timed out after {0:?}")]
    Timeout(Duration),

    #[error("Long-poll cancelled by client")]
    Cancelled,

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FeedError {
    /// True if the error was caused by the request rather than by the feed.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FeedError::Serialization(_))
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Serialization(e.to_string())
    }
}

impl From<regex::Error> for FeedError {
    fn from(e: regex::Error) -> Self {
        FeedError::InvalidPattern(e.to_string())
    }
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
