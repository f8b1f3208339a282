//! In-memory queue for tests and local runs.
//!
//! Models the at-least-once contract the real provider gives us: records
//! stay in flight until a batch report acknowledges them, failed records
//! are redelivered, and records past the maximum receive count move to a
//! dead-letter buffer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::{QueueSender, validate_entries};
use crate::error::Result;
use crate::message::{BatchReport, OutboundMessage, QueueRecord, RecordBatch, SendReport};

/// Default maximum deliveries before a record is dead-lettered.
pub const DEFAULT_MAX_RECEIVE_COUNT: u32 = 3;

/// In-process [`QueueSender`] with visibility and dead-letter semantics.
pub struct MemoryQueue {
    max_receive_count: u32,
    next_message_id: AtomicU64,
    inner: Mutex<Channels>,
}

#[derive(Default)]
struct Channels {
    pending: VecDeque<QueueRecord>,
    inflight: Vec<QueueRecord>,
    dead_letter: Vec<QueueRecord>,
}

impl MemoryQueue {
    /// Create a queue with the default receive limit.
    pub fn new() -> Self {
        Self::with_max_receive_count(DEFAULT_MAX_RECEIVE_COUNT)
    }

    /// Create a queue dead-lettering after `max_receive_count` deliveries.
    pub fn with_max_receive_count(max_receive_count: u32) -> Self {
        Self {
            max_receive_count,
            next_message_id: AtomicU64::new(1),
            inner: Mutex::new(Channels::default()),
        }
    }

    /// Deliver up to `max` records, moving them in flight.
    pub async fn receive(&self, max: usize) -> RecordBatch {
        let mut inner = self.inner.lock().await;

        let mut records = Vec::new();
        while records.len() < max {
            let Some(mut record) = inner.pending.pop_front() else {
                break;
            };
            record.receive_count += 1;
            inner.inflight.push(record.clone());
            records.push(record);
        }

        RecordBatch::new(records)
    }

    /// Apply a consumer report: ack successes, redeliver failures, and
    /// dead-letter records past the receive limit.
    pub async fn apply_report(&self, report: &BatchReport) {
        let mut inner = self.inner.lock().await;

        let inflight = std::mem::take(&mut inner.inflight);
        for record in inflight {
            if !report.contains(&record.message_id) {
                continue; // acknowledged
            }
            if record.receive_count >= self.max_receive_count {
                debug!(message_id = %record.message_id, "record dead-lettered");
                inner.dead_letter.push(record);
            } else {
                inner.pending.push_back(record);
            }
        }
    }

    /// Number of records awaiting delivery.
    pub async fn pending_len(&self) -> usize {
        self.inner.lock().await.pending.len()
    }

    /// Records moved to the dead-letter buffer.
    pub async fn dead_letters(&self) -> Vec<QueueRecord> {
        self.inner.lock().await.dead_letter.clone()
    }

    /// Snapshot of pending record bodies, in delivery order.
    pub async fn pending_bodies(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .pending
            .iter()
            .map(|r| r.body.clone())
            .collect()
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueSender for MemoryQueue {
    async fn send_batch(&self, entries: Vec<OutboundMessage>) -> Result<SendReport> {
        validate_entries(&entries)?;

        let mut inner = self.inner.lock().await;
        let mut report = SendReport::default();

        for entry in entries {
            let n = self.next_message_id.fetch_add(1, Ordering::SeqCst);
            inner.pending.push_back(QueueRecord {
                message_id: format!("m{n}"),
                body: entry.body,
                receive_count: 0,
            });
            report.successful.push(entry.id);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(n: usize) -> Vec<OutboundMessage> {
        (0..n)
            .map(|i| OutboundMessage::new(i.to_string(), format!("body-{i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_send_receive_ack_cycle() {
        let queue = MemoryQueue::new();

        let report = queue.send_batch(entries(3)).await.unwrap();
        assert_eq!(report.sent_count(), 3);
        assert_eq!(queue.pending_len().await, 3);

        let batch = queue.receive(10).await;
        assert_eq!(batch.len(), 3);
        assert!(batch.records.iter().all(|r| r.receive_count == 1));

        queue.apply_report(&BatchReport::clean()).await;
        assert_eq!(queue.pending_len().await, 0);
        assert!(queue.dead_letters().await.is_empty());
    }

    #[tokio::test]
    async fn test_only_failed_records_are_redelivered() {
        let queue = MemoryQueue::new();
        queue.send_batch(entries(3)).await.unwrap();

        let batch = queue.receive(10).await;
        let failed = batch.records[1].message_id.clone();
        queue
            .apply_report(&BatchReport {
                failed_message_ids: vec![failed.clone()],
            })
            .await;

        let redelivered = queue.receive(10).await;
        assert_eq!(redelivered.len(), 1);
        assert_eq!(redelivered.records[0].message_id, failed);
        assert_eq!(redelivered.records[0].receive_count, 2);
    }

    #[tokio::test]
    async fn test_dead_letter_after_max_receives() {
        let queue = MemoryQueue::with_max_receive_count(3);
        queue.send_batch(entries(1)).await.unwrap();

        for _ in 0..3 {
            let batch = queue.receive(10).await;
            assert_eq!(batch.len(), 1);
            let failed = batch.records[0].message_id.clone();
            queue
                .apply_report(&BatchReport {
                    failed_message_ids: vec![failed],
                })
                .await;
        }

        assert_eq!(queue.pending_len().await, 0);
        let dead = queue.dead_letters().await;
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].receive_count, 3);
    }
}
