//! Error types for audit sinks.

use thiserror::Error;

/// Errors that can occur while persisting an audit entry.
#[derive(Debug, Error)]
pub enum SinkError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store answered with a non-success status
    #[error("Log store returned {status}: {body}")]
    Rejected {
        /// HTTP status from the store
        status: u16,
        /// Response body, verbatim
        body: String,
    },
}
