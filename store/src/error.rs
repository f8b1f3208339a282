//! Error types for the document store gateway.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store API returned a non-success status.
    #[error("document store request failed: {0}")]
    Api(String),

    /// The store answered 2xx but the body was not usable.
    #[error("invalid document store response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Embedding-level failure during an in-memory similarity search.
    #[error("similarity error: {0}")]
    Similarity(#[from] docvec_embeddings::EmbeddingError),
}
