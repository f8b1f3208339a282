//! Error types for the embedding client.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while computing embeddings.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// No API key available for the configured endpoint.
    #[error("embedding client not configured: missing API key")]
    NotConfigured,

    /// The inference endpoint returned a non-success status.
    #[error("embedding API request failed: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The endpoint answered 2xx but the body was not usable.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// The model returned a vector of zero length.
    #[error("embedding model returned an empty vector")]
    EmptyEmbedding,

    /// Vector length differs from the configured model dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
