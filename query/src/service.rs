//! Query service implementation.

use std::sync::Arc;

use tracing::debug;

use docvec_embeddings::Embedder;
use docvec_store::{DocumentStore, ScoredDocument};

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};

/// Serves similarity queries over the stored vectors.
///
/// Shares the embedding client and store gateway with the write path;
/// an embedding failure aborts the request and is not retried here.
pub struct QueryService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
    config: QueryConfig,
}

impl QueryService {
    /// Create a service over the given gateways.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn DocumentStore>,
        config: QueryConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// Rank the stored documents closest to `query_text`, descending.
    pub async fn search(&self, query_text: &str) -> Result<Vec<ScoredDocument>> {
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        debug!(top_k = self.config.top_k, "similarity query");

        let embedding = self.embedder.embed(query_text).await?;
        let hits = self
            .store
            .vector_search(&embedding, self.config.top_k)
            .await?;

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use docvec_embeddings::FixtureEmbedder;
    use docvec_store::{Document, MemoryDocumentStore};
    use pretty_assertions::assert_eq;

    async fn service_with_documents(embedder: FixtureEmbedder) -> QueryService {
        let store = MemoryDocumentStore::new();
        store
            .insert(
                Document::new("sports-movie")
                    .with_title("The Match")
                    .with_text("an underdog sports team")
                    .with_embedding(&[1.0, 0.0, 0.0]),
            )
            .await;
        store
            .insert(
                Document::new("space-movie")
                    .with_title("Orbit")
                    .with_text("a voyage to the stars")
                    .with_embedding(&[0.0, 1.0, 0.0]),
            )
            .await;
        store
            .insert(
                Document::new("heist-movie")
                    .with_title("The Take")
                    .with_text("a bank job gone wrong")
                    .with_embedding(&[0.6, 0.6, 0.0]),
            )
            .await;
        store
            .insert(
                Document::new("drama-movie")
                    .with_title("Quiet Rooms")
                    .with_text("a family falls apart")
                    .with_embedding(&[0.2, 0.9, 0.1]),
            )
            .await;

        QueryService::new(Arc::new(embedder), Arc::new(store), QueryConfig::default())
    }

    #[tokio::test]
    async fn test_empty_query_is_a_client_error() {
        let service = service_with_documents(FixtureEmbedder::new(3)).await;

        for text in ["", "   ", "\n\t"] {
            let err = service.search(text).await.unwrap_err();
            assert!(matches!(err, QueryError::EmptyQuery));
            assert!(err.is_client_error());
        }
    }

    #[tokio::test]
    async fn test_search_ranks_descending_and_caps_at_top_k() {
        let embedder =
            FixtureEmbedder::new(3).with_vector("sports", vec![1.0, 0.1, 0.0]);
        let service = service_with_documents(embedder).await;

        let hits = service.search("sports").await.unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "sports-movie");
        assert_eq!(hits[0].title.as_deref(), Some("The Match"));
        assert!(hits[0].score > hits[1].score);
        assert!(hits[1].score >= hits[2].score);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_a_service_error() {
        let embedder = FixtureEmbedder::new(3).failing_on("sports");
        let service = service_with_documents(embedder).await;

        let err = service.search("sports").await.unwrap_err();
        assert!(matches!(err, QueryError::Embedding(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_query_text_is_trimmed_before_embedding() {
        let embedder =
            FixtureEmbedder::new(3).with_vector("sports", vec![1.0, 0.0, 0.0]);
        let service = service_with_documents(embedder).await;

        let hits = service.search("  sports  ").await.unwrap();
        assert_eq!(hits[0].id, "sports-movie");
    }
}
