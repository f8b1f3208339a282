//! # docvec app
//!
//! Wires the gateways, pipeline, and query service together behind typed
//! handlers. Transport framing is the deployment's concern; the handlers
//! here take parsed requests and return typed responses, in the same way
//! an inbound gateway or queue trigger would call them.

pub mod config;
pub mod handlers;
pub mod state;

pub use config::AppConfig;
pub use handlers::{ApiError, BackfillRequest, ErrorBody, SearchRequest};
pub use state::AppState;
