//! # Document store gateway
//!
//! Typed read/replace/search operations against the document collection.
//!
//! [`Document`] keeps the stored key separate from an open field map so
//! that externally-produced snapshots round-trip unchanged through the
//! pipeline. The [`DocumentStore`] trait is the seam the dispatcher,
//! consumer, and query service share; [`HttpDocumentStore`] speaks a
//! Data-API-shaped JSON protocol, [`MemoryDocumentStore`] backs tests and
//! local runs.

pub mod document;
pub mod error;
pub mod gateway;
pub mod memory;

pub use document::{Document, EMBEDDING_FIELD, ScoredDocument, TEXT_FIELD, TITLE_FIELD};
pub use error::{Result, StoreError};
pub use gateway::{DocumentStore, HttpDocumentStore, StoreConfig};
pub use memory::MemoryDocumentStore;
