//! Error types for dashboard sources.

use thiserror::Error;

/// Errors that can occur when fetching from a dashboard source.
///
/// The refresh cycle treats every variant the same way (log and keep the
/// previous values); the variants only exist to make logs useful.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Reading a local source failed.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// The source document has no entry for this section.
    #[error("Missing section: {0}")]
    Missing(String),

    /// The fetch task ended without producing a result.
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
