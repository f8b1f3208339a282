//! # Vector query service
//!
//! The read side of docvec: converts a free-text request into a vector
//! via the shared embedding client and ranks stored documents by cosine
//! similarity via the store gateway.

pub mod config;
pub mod error;
pub mod service;

pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use service::QueryService;

pub use docvec_store::ScoredDocument;
