//! # Embedding pipeline
//!
//! The write side of docvec: the [`BackfillDispatcher`] selects documents
//! that still need a vector and fans them into the queue as bounded
//! batches; the [`BatchConsumer`] processes delivered batches with
//! per-record isolation and reports exactly which records failed, so the
//! queue redelivers only those.
//!
//! Work is at-least-once end to end. The consumer's write is an
//! idempotent full-document replace, so duplicate deliveries of the same
//! change event converge on the same stored state.

pub mod budget;
pub mod config;
pub mod consumer;
pub mod dispatcher;
pub mod error;
pub mod outcome;

pub use budget::TimeBudget;
pub use config::PipelineConfig;
pub use consumer::BatchConsumer;
pub use dispatcher::{BackfillDispatcher, BackfillSummary};
pub use error::{PipelineError, Result};
pub use outcome::{RecordOutcome, report_from};
