//! # Queue gateway
//!
//! Batched send and batched receive contracts against the message queue,
//! plus the change-event envelope that rides in message bodies.
//!
//! The envelope shape is shared with the external change-capture trigger:
//! an event fanned out by the backfill dispatcher and one produced by the
//! trigger are indistinguishable to the consumer. Delivery itself is the
//! host's event mechanism; this crate only defines what a delivered batch
//! looks like ([`RecordBatch`]) and what the consumer reports back
//! ([`BatchReport`]).

pub mod client;
pub mod error;
pub mod event;
pub mod memory;
pub mod message;

pub use client::{HttpQueueClient, QueueConfig, QueueSender};
pub use error::{QueueError, Result};
pub use event::{ChangeDetail, ChangeEvent, DocumentKey, OperationType};
pub use memory::MemoryQueue;
pub use message::{
    BatchReport, MAX_BATCH_ENTRIES, OutboundMessage, QueueRecord, RecordBatch, SendFailure,
    SendReport,
};
