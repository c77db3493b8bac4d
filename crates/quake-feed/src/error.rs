//! Error types for quake-feed.

use thiserror::Error;

/// Errors that can occur while fetching or decoding a feed response.
///
/// These never cross the [`crate::FeedClient::poll`] boundary; they exist so
/// the failure cause is precise in logs.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// Response body was not well-formed JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp field could not be parsed.
    #[error("bad timestamp: {0}")]
    BadTimestamp(String),

    /// Response was well-formed but contained no entries.
    #[error("feed returned no entries")]
    Empty,
}
