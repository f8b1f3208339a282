//! Error types for the queue gateway.

use thiserror::Error;

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Errors that can occur talking to the message queue.
#[derive(Error, Debug)]
pub enum QueueError {
    /// A send batch exceeded the provider's entry limit.
    #[error("too many entries in batch: {count}, max {max}")]
    TooManyEntries { count: usize, max: usize },

    /// Two entries within one send batch shared an identifier.
    #[error("duplicate entry id within batch: {0}")]
    DuplicateEntryId(String),

    /// The queue API returned a non-success status.
    #[error("queue request failed: {0}")]
    Api(String),

    /// Serialization error while building a message body.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
