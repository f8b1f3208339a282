//! Message and batch types shared by the send and receive paths.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::ChangeEvent;

/// Provider maximum for entries in one send batch.
pub const MAX_BATCH_ENTRIES: usize = 10;

/// One message queued for sending.
///
/// The id must be unique within its send batch; it need not be globally
/// unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Batch-unique entry identifier.
    pub id: String,

    /// Opaque payload.
    pub body: String,
}

impl OutboundMessage {
    /// Create a message with an explicit body.
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }

    /// Wrap a change event as the message payload.
    pub fn from_event(id: impl Into<String>, event: &ChangeEvent) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            body: serde_json::to_string(event)?,
        })
    }
}

/// Per-entry result of one send batch.
#[derive(Debug, Clone, Default)]
pub struct SendReport {
    /// Entry ids accepted by the queue.
    pub successful: Vec<String>,

    /// Entries the queue rejected.
    pub failed: Vec<SendFailure>,
}

impl SendReport {
    /// Number of entries accepted.
    pub fn sent_count(&self) -> usize {
        self.successful.len()
    }
}

/// One rejected send entry.
#[derive(Debug, Clone)]
pub struct SendFailure {
    /// Entry id as submitted.
    pub id: String,

    /// Provider-reported reason.
    pub message: String,
}

/// One delivered record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRecord {
    /// Queue-assigned message identifier; the correlation id for all
    /// processing of this record.
    pub message_id: String,

    /// Opaque payload.
    pub body: String,

    /// How many times this record has been delivered.
    pub receive_count: u32,
}

impl QueueRecord {
    /// Create a first-delivery record.
    pub fn new(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            body: body.into(),
            receive_count: 1,
        }
    }
}

/// An ordered, bounded batch of delivered records.
///
/// Records are independent: no cross-record invariant is assumed on
/// delivery order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordBatch {
    /// Delivered records.
    pub records: Vec<QueueRecord>,
}

impl RecordBatch {
    /// Create a batch from records.
    pub fn new(records: Vec<QueueRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which delivered records failed, reported back to the queue so only
/// those are redelivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Message ids to leave in flight for redelivery.
    pub failed_message_ids: Vec<String>,
}

impl BatchReport {
    /// A report with no failures: every record may be acknowledged.
    pub fn clean() -> Self {
        Self::default()
    }

    /// Whether every record succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed_message_ids.is_empty()
    }

    /// Whether the given message id is reported failed.
    pub fn contains(&self, message_id: &str) -> bool {
        self.failed_message_ids.iter().any(|id| id == message_id)
    }
}
