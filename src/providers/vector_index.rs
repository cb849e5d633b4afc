//! Vector index provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::types::document::SegmentMetadata;

/// Distance metric for the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine similarity
    Cosine,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMetric::Cosine => write!(f, "cosine"),
        }
    }
}

/// A vector with its id and metadata, as stored in the index
#[derive(Debug, Clone)]
pub struct VectorRecord {
    /// Segment id
    pub id: String,
    /// Embedding values
    pub values: Vec<f32>,
    /// Segment metadata
    pub metadata: SegmentMetadata,
}

/// A ranked match from a similarity query
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// Segment id
    pub id: String,
    /// Relevance score, higher is more similar
    pub score: f32,
    /// Segment metadata as stored at upsert time
    pub metadata: SegmentMetadata,
}

/// Trait for vector storage and similarity search.
///
/// Implementations report failures as `Error::Upstream` with stage
/// `VectorIndex`. Ordering of equal-score matches is implementation-defined.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Idempotent index setup for the given dimension and metric
    async fn ensure_index(&self, dimensions: usize, metric: DistanceMetric) -> Result<()>;

    /// Insert-or-replace a batch of records by id
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Return the `top_k` nearest records, ordered by descending score, with
    /// metadata but without raw vectors. An empty index yields an empty vec.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>>;

    /// Delete all segments belonging to a document; returns how many existed
    async fn delete_by_document(&self, document_id: &Uuid) -> Result<usize>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
