//! Embedding clients.
//!
//! One trait, two implementations: [`OpenAiEmbedder`] for the real
//! inference endpoint and [`FixtureEmbedder`] for deterministic offline
//! use.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EmbeddingError, Result};
use crate::{DEFAULT_DIMENSION, Embedding};

/// Configuration for the embedding client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// API key for the inference endpoint.
    pub api_key: Option<String>,

    /// Base URL of the inference endpoint.
    pub base_url: String,

    /// Model identifier. The pipeline uses exactly one configured model.
    pub model: String,

    /// Expected vector length for the configured model.
    pub dimension: usize,
}

impl EmbedderConfig {
    /// Create a config for the given model with default endpoint settings.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the expected vector dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self::new("text-embedding-3-small")
    }
}

/// Converts text into a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// The configured model identifier.
    fn model(&self) -> &str;

    /// Vector length produced by the configured model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    ///
    /// A non-success response, an empty vector, or a vector of the wrong
    /// length are all failures.
    async fn embed(&self, text: &str) -> Result<Embedding>;
}

/// Embedding client for an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbedder {
    config: EmbedderConfig,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    /// Create a new client from the given configuration.
    pub fn new(config: EmbedderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::NotConfigured)?;

        debug!(model = %self.config.model, "requesting embedding");

        let body = serde_json::json!({
            "input": text,
            "model": self.config.model,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {error_text}")));
        }

        let result: EmbeddingApiResponse = response.json().await?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| {
                EmbeddingError::InvalidResponse("no embedding in response".to_string())
            })?
            .embedding;

        if embedding.is_empty() {
            return Err(EmbeddingError::EmptyEmbedding);
        }
        if embedding.len() != self.config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: embedding.len(),
            });
        }

        debug!(dimension = embedding.len(), "embedding generated");
        Ok(embedding)
    }
}

/// Wire format of the `/embeddings` response.
#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingApiData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiData {
    embedding: Vec<f32>,
}

/// Deterministic in-process embedder.
///
/// Produces a stable pseudo-random vector per input text, so repeated
/// calls with the same text yield the same embedding. Specific texts can
/// be pinned to fixed vectors or forced to fail.
pub struct FixtureEmbedder {
    dimension: usize,
    pinned: HashMap<String, Embedding>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl FixtureEmbedder {
    /// Create a fixture embedder producing vectors of the given length.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            pinned: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pin a text to a fixed vector.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Embedding) -> Self {
        self.pinned.insert(text.into(), vector);
        self
    }

    /// Make embedding the given text fail.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing.insert(text.into());
        self
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FixtureEmbedder {
    fn model(&self) -> &str {
        "fixture"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(text) {
            return Err(EmbeddingError::Api("injected fixture failure".to_string()));
        }

        if let Some(vector) = self.pinned.get(text) {
            return Ok(vector.clone());
        }

        Ok(seeded_vector(text, self.dimension))
    }
}

/// Derive a stable vector from a text via FNV hashing and an LCG.
fn seeded_vector(text: &str, dimension: usize) -> Embedding {
    let mut state = text
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x100_0000_01b3)
        });

    let mut vector = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let unit = ((state >> 33) as f32) / ((1_u64 << 31) as f32) - 1.0;
        vector.push(unit);
    }
    vector
}
