//! Application state: the injected gateways and the services over them.

use std::sync::Arc;

use tracing::info;

use docvec_embeddings::{Embedder, OpenAiEmbedder};
use docvec_pipeline::{BackfillDispatcher, BatchConsumer};
use docvec_query::QueryService;
use docvec_queue::{HttpQueueClient, QueueSender};
use docvec_store::{DocumentStore, HttpDocumentStore};

use crate::config::AppConfig;

/// One worker's shared state.
///
/// Client handles are built once per worker and reused across
/// invocations; they are read-mostly and safe to share via `Arc`, but
/// are never assumed shared across workers.
pub struct AppState {
    config: AppConfig,
    pub(crate) dispatcher: BackfillDispatcher,
    pub(crate) consumer: BatchConsumer,
    pub(crate) query: QueryService,
}

impl AppState {
    /// Build state over the HTTP gateways described by the config.
    pub fn new(config: AppConfig) -> Self {
        let store: Arc<dyn DocumentStore> =
            Arc::new(HttpDocumentStore::new(config.store.clone()));
        let queue: Arc<dyn QueueSender> = Arc::new(HttpQueueClient::new(config.queue.clone()));
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(config.embedder.clone()));

        Self::with_gateways(config, store, queue, embedder)
    }

    /// Build state over explicit gateway implementations.
    ///
    /// The injection seam used by tests and local runs.
    pub fn with_gateways(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        queue: Arc<dyn QueueSender>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let dispatcher =
            BackfillDispatcher::new(store.clone(), queue, config.pipeline.clone());
        let consumer = BatchConsumer::new(store.clone(), embedder.clone(), config.pipeline.clone());
        let query = QueryService::new(embedder, store, config.query.clone());

        Self {
            config,
            dispatcher,
            consumer,
            query,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Release held client handles.
    ///
    /// Call on process shutdown signals; dropping the state closes the
    /// underlying connections.
    pub async fn shutdown(self) {
        info!("releasing client handles");
        drop(self);
    }
}
