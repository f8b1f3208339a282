//! Store gateway trait and the HTTP-backed implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use docvec_embeddings::Embedding;

use crate::document::{Document, EMBEDDING_FIELD, ScoredDocument, TEXT_FIELD, TITLE_FIELD};
use crate::error::{Result, StoreError};

/// Typed operations against the document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents with text present and vector absent, capped at `limit`.
    ///
    /// No ordering guarantee beyond store-stable iteration.
    async fn find_candidates(&self, limit: usize) -> Result<Vec<Document>>;

    /// Replace the full document matching `key` with `document`.
    ///
    /// Returns the matched count: 0 means the key was not found (or a
    /// race deleted it), never a partial write.
    async fn replace_document(&self, key: &str, document: &Document) -> Result<u64>;

    /// Top-`k` nearest stored vectors by cosine similarity, descending.
    async fn vector_search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredDocument>>;
}

/// Configuration for the HTTP store gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store's Data API.
    pub base_url: String,

    /// API key sent with each request. Retrieval of the key itself is the
    /// deployment's concern.
    pub api_key: Option<String>,

    /// Named data source (cluster) within the store.
    pub data_source: String,

    /// Database name.
    pub database: String,

    /// Collection name.
    pub collection: String,

    /// Vector search index name.
    pub vector_index: String,

    /// Candidate pool multiplier for approximate vector search.
    pub search_candidate_factor: usize,
}

impl StoreConfig {
    /// Create a config for the given endpoint and collection coordinates.
    pub fn new(
        base_url: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            data_source: "default".to_string(),
            database: database.into(),
            collection: collection.into(),
            vector_index: "vector_index".to_string(),
            search_candidate_factor: 20,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the data source name.
    pub fn with_data_source(mut self, name: impl Into<String>) -> Self {
        self.data_source = name.into();
        self
    }

    /// Set the vector search index name.
    pub fn with_vector_index(mut self, name: impl Into<String>) -> Self {
        self.vector_index = name.into();
        self
    }
}

/// Document store gateway speaking a Data-API-shaped JSON protocol.
///
/// One instance holds one lazily-connecting HTTP client, reused across
/// invocations within the same worker.
pub struct HttpDocumentStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl HttpDocumentStore {
    /// Create a new gateway from the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// POST one Data API action and return the parsed response body.
    async fn action<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let mut request = self
            .client
            .post(format!("{}/action/{action}", self.config.base_url))
            .header("Content-Type", "application/json");

        if let Some(key) = &self.config.api_key {
            request = request.header("api-key", key);
        }

        let response = request.json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("{action}: {status}: {error_text}")));
        }

        Ok(response.json().await?)
    }

    /// Common collection coordinates for every action body.
    fn scope(&self) -> serde_json::Value {
        json!({
            "dataSource": self.config.data_source,
            "database": self.config.database,
            "collection": self.config.collection,
        })
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn find_candidates(&self, limit: usize) -> Result<Vec<Document>> {
        let mut body = self.scope();
        body["filter"] = json!({
            TEXT_FIELD: { "$exists": true },
            EMBEDDING_FIELD: { "$exists": false },
        });
        body["limit"] = json!(limit);

        let response: FindResponse = self.action("find", body).await?;
        debug!(count = response.documents.len(), "candidate documents read");
        Ok(response.documents)
    }

    async fn replace_document(&self, key: &str, document: &Document) -> Result<u64> {
        let mut body = self.scope();
        body["filter"] = json!({ "_id": key });
        body["replacement"] = serde_json::to_value(document)?;

        let response: ReplaceResponse = self.action("replaceOne", body).await?;
        debug!(key, matched = response.matched_count, "document replaced");
        Ok(response.matched_count)
    }

    async fn vector_search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredDocument>> {
        let query: Embedding = vector.to_vec();
        let mut body = self.scope();
        body["pipeline"] = json!([
            {
                "$vectorSearch": {
                    "index": self.config.vector_index,
                    "path": EMBEDDING_FIELD,
                    "queryVector": query,
                    "numCandidates": k * self.config.search_candidate_factor,
                    "limit": k,
                }
            },
            {
                "$project": {
                    "_id": 1,
                    TITLE_FIELD: 1,
                    TEXT_FIELD: 1,
                    "score": { "$meta": "vectorSearchScore" },
                }
            },
        ]);

        let response: SearchResponse = self.action("aggregate", body).await?;
        Ok(response.documents)
    }
}

/// Wire format of a `find` response.
#[derive(Debug, Deserialize)]
struct FindResponse {
    documents: Vec<Document>,
}

/// Wire format of a `replaceOne` response.
#[derive(Debug, Deserialize)]
struct ReplaceResponse {
    #[serde(rename = "matchedCount")]
    matched_count: u64,
}

/// Wire format of an `aggregate` response carrying scored hits.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    documents: Vec<ScoredDocument>,
}
