//! End-to-end pipeline tests over the in-memory gateways: dispatch,
//! delivery, consumption, acknowledgement, redelivery, dead-lettering.

use std::sync::Arc;
use std::time::Duration;

use docvec_embeddings::FixtureEmbedder;
use docvec_pipeline::{BackfillDispatcher, BatchConsumer, PipelineConfig, TimeBudget};
use docvec_queue::MemoryQueue;
use docvec_store::{Document, DocumentStore, MemoryDocumentStore};

const DIM: usize = 8;

fn budget() -> TimeBudget {
    TimeBudget::starting_now(Duration::from_secs(30))
}

async fn seed(store: &MemoryDocumentStore, count: usize) {
    for i in 0..count {
        store
            .insert(Document::new(format!("doc-{i:02}")).with_text(format!("plot number {i}")))
            .await;
    }
}

#[tokio::test]
async fn backfill_then_consume_embeds_all_dispatched_documents() {
    let store = Arc::new(MemoryDocumentStore::new());
    let queue = Arc::new(MemoryQueue::new());
    let embedder = Arc::new(FixtureEmbedder::new(DIM));
    let config = PipelineConfig::default();

    seed(&store, 20).await;

    let dispatcher = BackfillDispatcher::new(store.clone(), queue.clone(), config.clone());
    let summary = dispatcher.run_backfill(50).await.unwrap();
    assert_eq!(summary.read, 20);
    assert_eq!(summary.sent, 20);

    let consumer = BatchConsumer::new(store.clone(), embedder, config.clone());
    while queue.pending_len().await > 0 {
        let batch = queue.receive(config.batch_size).await;
        assert!(batch.len() <= config.batch_size);
        let report = consumer.handle_batch(&batch, budget()).await;
        assert!(report.is_clean());
        queue.apply_report(&report).await;
    }

    // Every dispatched document is now processed; none remain candidates.
    let leftover = store.find_candidates(50).await.unwrap();
    assert!(leftover.is_empty());
    assert!(queue.dead_letters().await.is_empty());
}

#[tokio::test]
async fn second_backfill_pass_picks_up_the_dropped_remainder() {
    let store = Arc::new(MemoryDocumentStore::new());
    let queue = Arc::new(MemoryQueue::new());
    let embedder = Arc::new(FixtureEmbedder::new(DIM));
    let config = PipelineConfig::default().with_batch_size(5);

    seed(&store, 12).await;

    let dispatcher = BackfillDispatcher::new(store.clone(), queue.clone(), config.clone());
    let consumer = BatchConsumer::new(store.clone(), embedder, config.clone());

    // First pass: 12 read, floor(12/5)*5 = 10 sent.
    let first = dispatcher.run_backfill(50).await.unwrap();
    assert_eq!((first.read, first.sent), (12, 10));

    while queue.pending_len().await > 0 {
        let batch = queue.receive(config.batch_size).await;
        let report = consumer.handle_batch(&batch, budget()).await;
        queue.apply_report(&report).await;
    }

    // Second pass sees only the 2 dropped candidates; still below the
    // batch size, so they wait for more work to accumulate.
    let second = dispatcher.run_backfill(50).await.unwrap();
    assert_eq!((second.read, second.sent), (2, 0));
}

#[tokio::test]
async fn failing_record_is_redelivered_until_dead_lettered() {
    let store = Arc::new(MemoryDocumentStore::new());
    let queue = Arc::new(MemoryQueue::with_max_receive_count(3));
    let config = PipelineConfig::default().with_batch_size(2);

    store
        .insert(Document::new("good").with_text("fine plot"))
        .await;
    store
        .insert(Document::new("poison").with_text("cursed plot"))
        .await;

    let embedder = Arc::new(FixtureEmbedder::new(DIM).failing_on("cursed plot"));
    let dispatcher = BackfillDispatcher::new(store.clone(), queue.clone(), config.clone());
    let consumer = BatchConsumer::new(store.clone(), embedder, config.clone());

    let summary = dispatcher.run_backfill(50).await.unwrap();
    assert_eq!(summary.sent, 2);

    // Delivery 1: good succeeds, poison fails and is redelivered alone.
    let batch = queue.receive(10).await;
    let report = consumer.handle_batch(&batch, budget()).await;
    assert_eq!(report.failed_message_ids.len(), 1);
    queue.apply_report(&report).await;
    assert!(store.get("good").await.unwrap().has_embedding());

    // Deliveries 2 and 3: poison keeps failing, then dead-letters.
    for _ in 0..2 {
        let batch = queue.receive(10).await;
        assert_eq!(batch.len(), 1);
        let report = consumer.handle_batch(&batch, budget()).await;
        queue.apply_report(&report).await;
    }

    assert_eq!(queue.pending_len().await, 0);
    let dead = queue.dead_letters().await;
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].receive_count, 3);
    assert!(!store.get("poison").await.unwrap().has_embedding());
}
