//! Error types for the embedding pipeline.

use thiserror::Error;

use docvec_embeddings::EmbeddingError;
use docvec_queue::QueueError;
use docvec_store::StoreError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while dispatching or consuming change events.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Remaining execution budget fell below the safety threshold before
    /// the record was started.
    #[error("time budget exhausted: {remaining_ms}ms remaining, {threshold_ms}ms required")]
    TimeBudgetExceeded { remaining_ms: u64, threshold_ms: u64 },

    /// The record payload did not parse as a change event.
    #[error("malformed change event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The document snapshot carried no text to embed.
    #[error("document {key} has no text to embed")]
    MissingText { key: String },

    /// The embedding call failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// A store call failed.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    /// The replace matched no stored document: the key is gone or a race
    /// deleted it.
    #[error("stale document key: {key} matched no stored document")]
    StaleDocument { key: String },

    /// A queue send failed.
    #[error("queue send failed: {0}")]
    Queue(#[from] QueueError),
}

impl PipelineError {
    /// Whether the failed record should stay in flight for redelivery.
    ///
    /// Malformed payloads count as operator-fixable rather than poison;
    /// true poison is escalated by the queue's receive limit into the
    /// dead-letter destination.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::TimeBudgetExceeded { .. }
            | Self::Payload(_)
            | Self::MissingText { .. }
            | Self::Embedding(_)
            | Self::Store(_)
            | Self::StaleDocument { .. }
            | Self::Queue(_) => true,
        }
    }
}
