//! In-process vector index
//!
//! Brute-force cosine search over a locked record list. Used by tests and as
//! the `memory` backend for local runs. Equal-score matches keep insertion
//! order (stable sort); no secondary sort key is applied.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result, Stage};

use super::vector_index::{DistanceMetric, ScoredMatch, VectorIndexProvider, VectorRecord};

/// In-process vector index
#[derive(Default)]
pub struct InMemoryIndex {
    records: RwLock<Vec<VectorRecord>>,
    dimensions: RwLock<Option<usize>>,
}

impl InMemoryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Ids currently stored for a document, in insertion order
    pub fn ids_for_document(&self, document_id: &Uuid) -> Vec<String> {
        self.records
            .read()
            .iter()
            .filter(|r| r.metadata.document_id == *document_id)
            .map(|r| r.id.clone())
            .collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndexProvider for InMemoryIndex {
    async fn ensure_index(&self, dimensions: usize, _metric: DistanceMetric) -> Result<()> {
        *self.dimensions.write() = Some(dimensions);
        Ok(())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if let Some(expected) = *self.dimensions.read() {
            for record in records {
                if record.values.len() != expected {
                    return Err(Error::upstream(
                        Stage::VectorIndex,
                        format!(
                            "vector {} has dimension {}, index is configured for {}",
                            record.id,
                            record.values.len(),
                            expected
                        ),
                    ));
                }
            }
        }

        let mut stored = self.records.write();
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => stored.push(record.clone()),
            }
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let stored = self.records.read();

        let mut matches: Vec<ScoredMatch> = stored
            .iter()
            .map(|record| ScoredMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn delete_by_document(&self, document_id: &Uuid) -> Result<usize> {
        let mut stored = self.records.write();
        let before = stored.len();
        stored.retain(|record| record.metadata.document_id != *document_id);
        Ok(before - stored.len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
