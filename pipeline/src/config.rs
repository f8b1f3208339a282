//! Configuration for the embedding pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by the dispatcher and consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Messages per send batch. Also the provider's delivery batch bound.
    pub batch_size: usize,

    /// Default candidate read limit for a backfill pass.
    pub default_read_limit: usize,

    /// Minimum remaining budget required to start a record, in
    /// milliseconds.
    pub time_safety_threshold_ms: u64,

    /// Deliveries before a failing record is dead-lettered.
    pub max_receive_count: u32,

    /// Trigger name stamped into dispatched change events.
    pub detail_type: String,
}

impl PipelineConfig {
    /// Set the send batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the default candidate read limit.
    pub fn with_read_limit(mut self, limit: usize) -> Self {
        self.default_read_limit = limit;
        self
    }

    /// Set the time-safety threshold in milliseconds.
    pub fn with_time_safety_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.time_safety_threshold_ms = threshold_ms;
        self
    }

    /// Set the receive limit before dead-lettering.
    pub fn with_max_receive_count(mut self, max_receive_count: u32) -> Self {
        self.max_receive_count = max_receive_count;
        self
    }

    /// The time-safety threshold as a duration.
    pub fn time_safety_threshold(&self) -> Duration {
        Duration::from_millis(self.time_safety_threshold_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            default_read_limit: 50,
            time_safety_threshold_ms: 1000,
            max_receive_count: 3,
            detail_type: "document-update".to_string(),
        }
    }
}
