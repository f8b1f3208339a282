//! Configuration for the query service.

use serde::{Deserialize, Serialize};

/// Configuration for similarity queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Number of nearest neighbors to return. No pagination.
    pub top_k: usize,
}

impl QueryConfig {
    /// Set the result count.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}
