//! Query-time state machine: Embedding → Retrieving → ContextBuilding →
//! Generating → Done
//!
//! Stages run linearly with no branching; any stage error short-circuits to a
//! failed query with the stage recorded on the error. Retrieval ordering for
//! an unchanged index is deterministic; generated text is not.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, GenerationProvider, VectorIndexProvider};
use crate::types::response::{AnswerRecord, RetrievedSegment, SourceRef};

use super::prompt::PromptBuilder;

/// Default number of segments retrieved per query
pub const DEFAULT_TOP_K: usize = 4;

/// Stages of the query pipeline, used for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Embedding,
    Retrieving,
    ContextBuilding,
    Generating,
}

impl std::fmt::Display for QueryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryStage::Embedding => write!(f, "embedding"),
            QueryStage::Retrieving => write!(f, "retrieving"),
            QueryStage::ContextBuilding => write!(f, "context_building"),
            QueryStage::Generating => write!(f, "generating"),
        }
    }
}

/// Retrieve-then-generate pipeline. Holds dependency-injected client handles;
/// safe to share across concurrent requests.
pub struct QueryPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    generator: Arc<dyn GenerationProvider>,
    top_k: usize,
}

impl QueryPipeline {
    /// Create a new query pipeline
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        generator: Arc<dyn GenerationProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            top_k,
        }
    }

    /// Answer a query. The query text must be non-empty (validated at the
    /// boundary before entering the pipeline).
    ///
    /// An empty index or zero matches is not an error: generation proceeds
    /// with no context and the answer carries an empty sources list.
    pub async fn answer(&self, query: &str) -> Result<AnswerRecord> {
        tracing::debug!(stage = %QueryStage::Embedding, "embedding query");
        let query_embedding = self.embedder.embed(query).await?;

        tracing::debug!(stage = %QueryStage::Retrieving, top_k = self.top_k, "retrieving segments");
        let matches = self.index.query(&query_embedding, self.top_k).await?;

        tracing::debug!(stage = %QueryStage::ContextBuilding, matches = matches.len(), "building context");
        let retrieved: Vec<RetrievedSegment> = matches
            .into_iter()
            .map(|m| RetrievedSegment {
                document_id: m.metadata.document_id,
                text: m.metadata.text,
                segment_id: m.id,
                score: m.score,
            })
            .collect();
        let prompt = PromptBuilder::build_prompt(query, &retrieved);

        tracing::debug!(stage = %QueryStage::Generating, "generating answer");
        let answer = self.generator.generate(&prompt).await?;

        let sources = retrieved
            .into_iter()
            .map(|r| SourceRef {
                segment_id: r.segment_id,
                document_id: r.document_id,
            })
            .collect();

        Ok(AnswerRecord { answer, sources })
    }
}
