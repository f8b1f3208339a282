//! Queue sender trait and the HTTP-backed implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{QueueError, Result};
use crate::message::{MAX_BATCH_ENTRIES, OutboundMessage, SendFailure, SendReport};

/// Batched send against the message queue.
///
/// Receive is not part of this trait: delivered batches arrive through
/// the host's event mechanism, not a pull loop this core implements.
#[async_trait]
pub trait QueueSender: Send + Sync {
    /// Send one batch of entries, at most [`MAX_BATCH_ENTRIES`].
    async fn send_batch(&self, entries: Vec<OutboundMessage>) -> Result<SendReport>;
}

/// Reject batches that violate the provider's entry contract.
pub(crate) fn validate_entries(entries: &[OutboundMessage]) -> Result<()> {
    if entries.len() > MAX_BATCH_ENTRIES {
        return Err(QueueError::TooManyEntries {
            count: entries.len(),
            max: MAX_BATCH_ENTRIES,
        });
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(QueueError::DuplicateEntryId(entry.id.clone()));
        }
    }

    Ok(())
}

/// Configuration for the HTTP queue gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue service endpoint.
    pub endpoint: String,

    /// Destination queue reference.
    pub queue_url: String,
}

impl QueueConfig {
    /// Create a config for the given endpoint and queue.
    pub fn new(endpoint: impl Into<String>, queue_url: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            queue_url: queue_url.into(),
        }
    }
}

/// Queue gateway speaking the SQS-compatible JSON protocol.
///
/// Request signing is a deployment concern (secret retrieval is out of
/// scope); the client targets endpoints that authenticate by other means.
pub struct HttpQueueClient {
    config: QueueConfig,
    client: reqwest::Client,
}

impl HttpQueueClient {
    /// Create a new gateway from the given configuration.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl QueueSender for HttpQueueClient {
    async fn send_batch(&self, entries: Vec<OutboundMessage>) -> Result<SendReport> {
        validate_entries(&entries)?;

        let wire_entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| json!({ "Id": e.id, "MessageBody": e.body }))
            .collect();

        let body = json!({
            "QueueUrl": self.config.queue_url,
            "Entries": wire_entries,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/x-amz-json-1.0")
            .header("X-Amz-Target", "AmazonSQS.SendMessageBatch")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(QueueError::Api(format!("{status}: {error_text}")));
        }

        let result: SendMessageBatchResponse = response.json().await?;

        let report = SendReport {
            successful: result.successful.into_iter().map(|e| e.id).collect(),
            failed: result
                .failed
                .into_iter()
                .map(|e| SendFailure {
                    id: e.id,
                    message: e.message.unwrap_or_else(|| e.code.clone()),
                })
                .collect(),
        };

        debug!(
            sent = report.sent_count(),
            rejected = report.failed.len(),
            "send batch completed"
        );
        Ok(report)
    }
}

/// Wire format of a `SendMessageBatch` response.
#[derive(Debug, Default, Deserialize)]
struct SendMessageBatchResponse {
    #[serde(rename = "Successful", default)]
    successful: Vec<SuccessfulEntry>,

    #[serde(rename = "Failed", default)]
    failed: Vec<FailedEntry>,
}

#[derive(Debug, Deserialize)]
struct SuccessfulEntry {
    #[serde(rename = "Id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct FailedEntry {
    #[serde(rename = "Id")]
    id: String,

    #[serde(rename = "Code", default)]
    code: String,

    #[serde(rename = "Message")]
    message: Option<String>,
}
