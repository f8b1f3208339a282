//! Typed request handlers.
//!
//! Each handler takes a parsed request and returns a typed response; the
//! transport (HTTP framing, queue trigger) lives outside this crate.
//! Dependency failures never leak internal detail to the caller: the
//! full error chain goes to operator logs, the caller gets one generic
//! message.

use serde::{Deserialize, Serialize};
use tracing::error;

use docvec_pipeline::{BackfillSummary, TimeBudget};
use docvec_queue::{BatchReport, RecordBatch};
use docvec_store::ScoredDocument;

use crate::state::AppState;

/// Caller-safe message for any dependency failure.
const GENERIC_FAILURE: &str = "unable to process request";

/// Body of the inbound query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query. Missing or empty text is a client error.
    pub query: Option<String>,
}

/// Parameters of the backfill-trigger endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackfillRequest {
    /// Candidate read limit; must be a positive integer. Defaults to the
    /// configured read limit.
    pub count: Option<i64>,
}

/// Caller-facing error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Caller-safe message.
    pub message: String,
}

/// A handler failure plus the status class it maps to outward.
#[derive(Debug)]
pub struct ApiError {
    /// 4xx-equivalent for caller errors, 5xx-equivalent otherwise.
    pub status: u16,

    /// Response body.
    pub body: ErrorBody,
}

impl ApiError {
    fn client(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            body: ErrorBody {
                message: message.into(),
            },
        }
    }

    fn server() -> Self {
        Self {
            status: 500,
            body: ErrorBody {
                message: GENERIC_FAILURE.to_string(),
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.body.message, self.status)
    }
}

impl std::error::Error for ApiError {}

impl AppState {
    /// Serve the inbound query endpoint.
    pub async fn handle_search(
        &self,
        request: SearchRequest,
    ) -> Result<Vec<ScoredDocument>, ApiError> {
        let query_text = request.query.unwrap_or_default();

        match self.query.search(&query_text).await {
            Ok(hits) => Ok(hits),
            Err(err) if err.is_client_error() => Err(ApiError::client(err.to_string())),
            Err(err) => {
                error!(error = ?err, "similarity query failed");
                Err(ApiError::server())
            }
        }
    }

    /// Serve the backfill-trigger endpoint.
    pub async fn handle_backfill(
        &self,
        request: BackfillRequest,
    ) -> Result<BackfillSummary, ApiError> {
        let limit = match request.count {
            None => self.config().pipeline.default_read_limit,
            Some(count) if count > 0 => count as usize,
            Some(count) => {
                return Err(ApiError::client(format!(
                    "count must be a positive integer, got {count}"
                )));
            }
        };

        match self.dispatcher.run_backfill(limit).await {
            Ok(summary) => Ok(summary),
            Err(err) => {
                error!(error = ?err, "backfill dispatch failed");
                Err(ApiError::server())
            }
        }
    }

    /// Process one delivered record batch.
    ///
    /// Per-record failures land in the report, never in a handler error;
    /// the queue redelivers exactly the reported records.
    pub async fn handle_record_batch(
        &self,
        batch: &RecordBatch,
        budget: TimeBudget,
    ) -> BatchReport {
        self.consumer.handle_batch(batch, budget).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_shapes() {
        let client = ApiError::client("count must be a positive integer, got -3");
        assert_eq!(client.status, 400);

        let server = ApiError::server();
        assert_eq!(server.status, 500);
        assert_eq!(server.body.message, GENERIC_FAILURE);
    }
}
