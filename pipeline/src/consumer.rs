//! Batch consumer.
//!
//! Processes delivered record batches sequentially in delivery order.
//! Failures are isolated per record: one record failing must not prevent
//! the others from being attempted and acknowledged. The returned report
//! names exactly the records to redeliver.

use std::sync::Arc;

use tracing::{Instrument, Span, debug, info_span, warn};

use docvec_embeddings::Embedder;
use docvec_queue::{BatchReport, ChangeEvent, QueueRecord, RecordBatch};
use docvec_store::DocumentStore;

use crate::budget::TimeBudget;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::outcome::{RecordOutcome, report_from};

/// Consumes delivered change-event batches and persists computed vectors.
pub struct BatchConsumer {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn Embedder>,
    config: PipelineConfig,
}

impl BatchConsumer {
    /// Create a consumer over the given gateways.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn Embedder>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Process every record in the batch, collecting per-record outcomes
    /// into the failed-id report the queue acts on.
    pub async fn handle_batch(&self, batch: &RecordBatch, budget: TimeBudget) -> BatchReport {
        let mut outcomes: Vec<(String, RecordOutcome)> = Vec::with_capacity(batch.len());

        for record in &batch.records {
            let outcome = self.handle_record(record, budget).await;
            if let RecordOutcome::Failure { error, retriable } = &outcome {
                warn!(
                    message_id = %record.message_id,
                    retriable,
                    error = %error,
                    "record processing failed"
                );
            }
            outcomes.push((record.message_id.clone(), outcome));
        }

        report_from(outcomes)
    }

    /// Process one record inside its correlation span.
    ///
    /// The span carries the message id from the start and gains the
    /// document key once the payload is parsed; it closes on every exit
    /// path when the guard drops.
    pub async fn handle_record(&self, record: &QueueRecord, budget: TimeBudget) -> RecordOutcome {
        let span = info_span!(
            "queue_record",
            message_id = %record.message_id,
            document_key = tracing::field::Empty,
        );

        match self.process(record, budget).instrument(span).await {
            Ok(()) => RecordOutcome::Success,
            Err(error) => {
                let retriable = error.is_retriable();
                RecordOutcome::Failure { error, retriable }
            }
        }
    }

    async fn process(&self, record: &QueueRecord, budget: TimeBudget) -> Result<()> {
        // Guard before any I/O: with less budget than the threshold the
        // host could kill us mid-write, silently dropping the record.
        let remaining = budget.remaining();
        let threshold = self.config.time_safety_threshold();
        if remaining < threshold {
            return Err(PipelineError::TimeBudgetExceeded {
                remaining_ms: remaining.as_millis() as u64,
                threshold_ms: threshold.as_millis() as u64,
            });
        }

        let event: ChangeEvent = serde_json::from_str(&record.body)?;
        let key = event.document_key().to_string();
        Span::current().record("document_key", tracing::field::display(&key));

        let snapshot = event.detail.full_document;
        let text = snapshot
            .text()
            .ok_or_else(|| PipelineError::MissingText { key: key.clone() })?;

        let embedding = self.embedder.embed(text).await?;

        let processed = snapshot.with_embedding(&embedding);
        let matched = self.store.replace_document(&key, &processed).await?;
        if matched == 0 {
            return Err(PipelineError::StaleDocument { key });
        }

        debug!(dimension = embedding.len(), "document vector persisted");
        Ok(())
    }
}
