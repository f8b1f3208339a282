//! Application configuration, assembled from the environment.

use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use docvec_embeddings::EmbedderConfig;
use docvec_pipeline::PipelineConfig;
use docvec_query::QueryConfig;
use docvec_queue::QueueConfig;
use docvec_store::StoreConfig;

/// Full configuration surface of the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document store gateway settings.
    pub store: StoreConfig,

    /// Queue gateway settings.
    pub queue: QueueConfig,

    /// Embedding client settings.
    pub embedder: EmbedderConfig,

    /// Dispatcher and consumer settings.
    pub pipeline: PipelineConfig,

    /// Query service settings.
    pub query: QueryConfig,

    /// Queue visibility/redelivery window, seconds. Applied to the queue
    /// by the deployment; recorded here as part of the config surface.
    pub visibility_timeout_secs: u64,
}

impl AppConfig {
    /// Load the configuration from environment variables, falling back
    /// to local-development defaults.
    pub fn from_env() -> Result<Self> {
        let mut store = StoreConfig::new(
            env_or("DOCVEC_STORE_URL", "http://localhost:8080"),
            env_or("DOCVEC_STORE_DATABASE", "media"),
            env_or("DOCVEC_STORE_COLLECTION", "movies"),
        )
        .with_data_source(env_or("DOCVEC_STORE_DATA_SOURCE", "default"))
        .with_vector_index(env_or("DOCVEC_STORE_VECTOR_INDEX", "vector_index"));
        if let Ok(key) = std::env::var("DOCVEC_STORE_API_KEY") {
            store = store.with_api_key(key);
        }

        let queue = QueueConfig::new(
            env_or("DOCVEC_QUEUE_ENDPOINT", "http://localhost:9324"),
            env_or("DOCVEC_QUEUE_URL", "http://localhost:9324/queue/docvec"),
        );

        let mut embedder = EmbedderConfig::new(env_or(
            "DOCVEC_EMBEDDING_MODEL",
            "text-embedding-3-small",
        ))
        .with_dimension(env_parse("DOCVEC_EMBEDDING_DIMENSION", 1536)?);
        if let Ok(url) = std::env::var("DOCVEC_EMBEDDING_URL") {
            embedder = embedder.with_base_url(url);
        }
        if let Ok(key) =
            std::env::var("DOCVEC_EMBEDDING_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY"))
        {
            embedder = embedder.with_api_key(key);
        }

        let pipeline = PipelineConfig::default()
            .with_batch_size(env_parse("DOCVEC_BATCH_SIZE", 10)?)
            .with_read_limit(env_parse("DOCVEC_READ_LIMIT", 50)?)
            .with_time_safety_threshold_ms(env_parse("DOCVEC_TIME_SAFETY_THRESHOLD_MS", 1000)?)
            .with_max_receive_count(env_parse("DOCVEC_MAX_RECEIVE_COUNT", 3)?);

        let query = QueryConfig::default().with_top_k(env_parse("DOCVEC_TOP_K", 3)?);

        Ok(Self {
            store,
            queue,
            embedder,
            pipeline,
            query,
            visibility_timeout_secs: env_parse("DOCVEC_VISIBILITY_TIMEOUT_SECS", 120)?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}
