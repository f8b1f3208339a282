//! Backfill dispatcher.
//!
//! Selects documents that still need a vector and fans them into the
//! queue as bounded change-event batches. Enqueues only; never mutates
//! the document store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docvec_queue::{ChangeEvent, OutboundMessage, QueueSender};
use docvec_store::{Document, DocumentStore};

use crate::config::PipelineConfig;
use crate::error::Result;

/// Counts from one backfill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillSummary {
    /// Candidate documents read from the store.
    pub read: usize,

    /// Documents successfully enqueued.
    pub sent: usize,
}

/// Fans candidate documents into the queue.
pub struct BackfillDispatcher {
    store: Arc<dyn DocumentStore>,
    queue: Arc<dyn QueueSender>,
    config: PipelineConfig,
}

impl BackfillDispatcher {
    /// Create a dispatcher over the given gateways.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        queue: Arc<dyn QueueSender>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            queue,
            config,
        }
    }

    /// Read up to `limit` candidate documents from the store.
    pub async fn select_candidates(&self, limit: usize) -> Result<Vec<Document>> {
        let candidates = self.store.find_candidates(limit).await?;
        debug!(count = candidates.len(), limit, "candidates selected");
        Ok(candidates)
    }

    /// Enqueue the documents in sequential chunks of exactly `batch_size`.
    ///
    /// Only full chunks are flushed; the trailing partial chunk is left
    /// for a later pass. A chunk send failure propagates to the caller —
    /// chunks already sent are not rolled back, which is acceptable
    /// because the consumer's write is idempotent.
    pub async fn dispatch(&self, documents: &[Document], batch_size: usize) -> Result<usize> {
        let mut sent = 0;

        for chunk in documents.chunks_exact(batch_size) {
            let mut entries = Vec::with_capacity(chunk.len());
            for (index, document) in chunk.iter().enumerate() {
                let event =
                    ChangeEvent::update(document.clone(), self.config.detail_type.as_str());
                entries.push(OutboundMessage::from_event(index.to_string(), &event)?);
            }

            let report = self.queue.send_batch(entries).await?;
            sent += report.sent_count();
        }

        Ok(sent)
    }

    /// One backfill pass: select candidates, dispatch full batches.
    pub async fn run_backfill(&self, limit: usize) -> Result<BackfillSummary> {
        let documents = self.select_candidates(limit).await?;
        let read = documents.len();
        let sent = self.dispatch(&documents, self.config.batch_size).await?;

        info!(read, sent, "backfill pass dispatched");
        Ok(BackfillSummary { read, sent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvec_queue::MemoryQueue;
    use docvec_store::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    async fn seeded_store(count: usize) -> Arc<MemoryDocumentStore> {
        let store = Arc::new(MemoryDocumentStore::new());
        for i in 0..count {
            store
                .insert(Document::new(format!("doc-{i:02}")).with_text(format!("plot {i}")))
                .await;
        }
        store
    }

    fn dispatcher(
        store: Arc<MemoryDocumentStore>,
        queue: Arc<MemoryQueue>,
    ) -> BackfillDispatcher {
        BackfillDispatcher::new(store, queue, PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_dispatch_sends_only_full_chunks() {
        let store = seeded_store(25).await;
        let queue = Arc::new(MemoryQueue::new());
        let dispatcher = dispatcher(store.clone(), queue.clone());

        let documents = dispatcher.select_candidates(50).await.unwrap();
        let sent = dispatcher.dispatch(&documents, 10).await.unwrap();

        // floor(25 / 10) = 2 full batches; the remainder of 5 is dropped.
        assert_eq!(sent, 20);
        assert_eq!(queue.pending_len().await, 20);
    }

    #[tokio::test]
    async fn test_dispatched_messages_are_update_events() {
        let store = seeded_store(10).await;
        let queue = Arc::new(MemoryQueue::new());
        let dispatcher = dispatcher(store, queue.clone());

        let summary = dispatcher.run_backfill(50).await.unwrap();
        assert_eq!(summary, BackfillSummary { read: 10, sent: 10 });

        for body in queue.pending_bodies().await {
            let event: ChangeEvent = serde_json::from_str(&body).unwrap();
            assert_eq!(event.detail_type, "document-update");
            assert_eq!(
                event.detail.full_document.id,
                event.document_key(),
                "snapshot key and document key must agree"
            );
            assert!(event.detail.full_document.is_candidate());
        }
    }

    #[tokio::test]
    async fn test_backfill_below_batch_size_sends_nothing() {
        let store = seeded_store(7).await;
        let queue = Arc::new(MemoryQueue::new());
        let dispatcher = dispatcher(store, queue.clone());

        let summary = dispatcher.run_backfill(10).await.unwrap();

        assert_eq!(summary, BackfillSummary { read: 7, sent: 0 });
        assert_eq!(queue.pending_len().await, 0);
    }

    #[tokio::test]
    async fn test_select_candidates_respects_limit() {
        let store = seeded_store(30).await;
        let queue = Arc::new(MemoryQueue::new());
        let dispatcher = dispatcher(store, queue);

        let documents = dispatcher.select_candidates(12).await.unwrap();
        assert_eq!(documents.len(), 12);
    }
}
