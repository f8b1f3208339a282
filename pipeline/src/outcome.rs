//! Per-record processing outcomes.

use docvec_queue::BatchReport;

use crate::error::PipelineError;

/// Result of processing one delivered record.
///
/// Success carries no payload; failure carries the cause and whether the
/// record should be redelivered.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The record's vector was computed and persisted.
    Success,

    /// The record failed.
    Failure {
        /// What went wrong.
        error: PipelineError,

        /// Whether the record should stay in flight for redelivery.
        retriable: bool,
    },
}

impl RecordOutcome {
    /// Whether the record succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Collapse collected `(message id, outcome)` pairs into the failed-id
/// report the queue acts on.
///
/// Only retriable failures are reported; anything else is acknowledged so
/// it is not redelivered.
pub fn report_from(outcomes: Vec<(String, RecordOutcome)>) -> BatchReport {
    BatchReport {
        failed_message_ids: outcomes
            .into_iter()
            .filter(|(_, outcome)| {
                matches!(
                    outcome,
                    RecordOutcome::Failure {
                        retriable: true,
                        ..
                    }
                )
            })
            .map(|(id, _)| id)
            .collect(),
    }
}
