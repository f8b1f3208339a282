//! Change-event envelope.
//!
//! Produced when a document is inserted or updated, carrying the
//! operation type, the document's key, and the full snapshot at the time
//! of the change. Exists only in queue transit; never persisted.

use serde::{Deserialize, Serialize};

use docvec_store::Document;

/// Envelope version emitted by both the dispatcher and the external
/// change-capture trigger.
const ENVELOPE_VERSION: &str = "0";

/// An envelope describing one document change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Envelope format version.
    pub version: String,

    /// Unique envelope id.
    pub id: String,

    /// Name of the trigger that produced the event.
    #[serde(rename = "detail-type")]
    pub detail_type: String,

    /// The change itself.
    pub detail: ChangeDetail,
}

impl ChangeEvent {
    /// Build an update event for the given document snapshot.
    ///
    /// This is the shape the backfill dispatcher fans out; it must be
    /// indistinguishable from a trigger-produced event downstream.
    pub fn update(document: Document, detail_type: impl Into<String>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            id: uuid::Uuid::new_v4().to_string(),
            detail_type: detail_type.into(),
            detail: ChangeDetail {
                operation_type: OperationType::Update,
                document_key: DocumentKey {
                    id: document.id.clone(),
                },
                full_document: document,
            },
        }
    }

    /// The changed document's key.
    pub fn document_key(&self) -> &str {
        &self.detail.document_key.id
    }
}

/// Operation type and document snapshot for one change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetail {
    /// What happened to the document.
    #[serde(rename = "operationType")]
    pub operation_type: OperationType,

    /// Full snapshot at the time of the change.
    #[serde(rename = "fullDocument")]
    pub full_document: Document,

    /// The document's key, supplied separately from the snapshot.
    #[serde(rename = "documentKey")]
    pub document_key: DocumentKey,
}

/// Key wrapper matching the store's key field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentKey {
    /// Opaque unique key.
    #[serde(rename = "_id")]
    pub id: String,
}

/// Kind of change that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Document was inserted.
    Insert,

    /// Document was updated in place.
    Update,

    /// Document was fully replaced.
    Replace,
}
