//! Error types for the query service.

use thiserror::Error;

use docvec_embeddings::EmbeddingError;
use docvec_store::StoreError;

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur serving a similarity query.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The request carried no query text.
    #[error("query text must not be empty")]
    EmptyQuery,

    /// Embedding the query text failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The similarity search failed.
    #[error("search failed: {0}")]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Whether the caller, not a dependency, caused the failure.
    ///
    /// The handler layer maps client errors to a 4xx-shaped response and
    /// everything else to one generic caller-safe message.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }
}
