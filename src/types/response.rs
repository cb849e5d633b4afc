//! Retrieval and boundary response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single retrieved segment with its relevance score. Produced per-query,
/// ordered by descending score; equal-score ordering is whatever the index
/// returned.
#[derive(Debug, Clone)]
pub struct RetrievedSegment {
    /// Segment id in the index
    pub segment_id: String,
    /// Owning document
    pub document_id: Uuid,
    /// Relevance score (higher is more relevant)
    pub score: f32,
    /// Segment text as stored in the index metadata
    pub text: String,
}

/// Reference to a segment that contributed to an answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    /// Segment id in the index
    pub segment_id: String,
    /// Owning document
    pub document_id: Uuid,
}

/// Final answer with provenance, in retrieval order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Generated answer text
    pub answer: String,
    /// Contributing segments, order matching the retrieval ranking
    pub sources: Vec<SourceRef>,
}

/// Response body for ingestion endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Stable document identifier
    pub file_id: Uuid,
    /// Human-readable status
    pub message: String,
}

/// Response body for the delete endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Document whose segments were removed
    pub file_id: Uuid,
    /// Human-readable status
    pub message: String,
}
