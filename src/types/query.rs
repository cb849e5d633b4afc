//! Query request types

use serde::{Deserialize, Serialize};

/// Chat request for the query boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question to answer; must be non-empty
    pub query: String,
}
