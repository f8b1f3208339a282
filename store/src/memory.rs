//! In-memory document store for tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use docvec_embeddings::{Embedding, similarity};

use crate::document::{Document, ScoredDocument};
use crate::error::Result;
use crate::gateway::DocumentStore;

/// Map-backed [`DocumentStore`] with the same observable contracts as the
/// HTTP gateway.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a document, keyed by its id.
    pub async fn insert(&self, document: Document) {
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document);
    }

    /// Fetch a document by key.
    pub async fn get(&self, key: &str) -> Option<Document> {
        self.documents.read().await.get(key).cloned()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_candidates(&self, limit: usize) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;

        let mut candidates: Vec<Document> = documents
            .values()
            .filter(|d| d.is_candidate())
            .cloned()
            .collect();
        // Stable iteration order for callers; no further guarantee implied.
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        candidates.truncate(limit);

        Ok(candidates)
    }

    async fn replace_document(&self, key: &str, document: &Document) -> Result<u64> {
        let mut documents = self.documents.write().await;

        if documents.contains_key(key) {
            documents.insert(key.to_string(), document.clone());
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn vector_search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredDocument>> {
        let documents = self.documents.read().await;

        let candidates: Vec<(String, Embedding)> = documents
            .values()
            .filter_map(|d| d.embedding().map(|e| (d.id.clone(), e)))
            .collect();

        let query: Embedding = vector.to_vec();
        let ranked = similarity::top_k(&query, &candidates, k)?;

        Ok(ranked
            .into_iter()
            .filter_map(|m| {
                documents.get(&m.id).map(|doc| ScoredDocument {
                    id: m.id,
                    title: doc.title().map(String::from),
                    text: doc.text().map(String::from),
                    score: m.score,
                })
            })
            .collect())
    }
}
