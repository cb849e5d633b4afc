//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::IngestionPipeline;
use crate::providers::{EmbeddingProvider, GenerationProvider, VectorIndexProvider};
use crate::query::QueryPipeline;

/// Shared application state. The only cross-request state is the long-lived
/// client handles inside the pipelines; requests themselves are stateless.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    ingestion: IngestionPipeline,
    query: QueryPipeline,
}

impl AppState {
    /// Create application state from explicitly constructed providers.
    ///
    /// Fails with a configuration error when the chunking settings are
    /// invalid.
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Result<Self> {
        tracing::info!(
            "Initializing application state (embedder: {}, generator: {}, index: {})",
            embedder.name(),
            generator.name(),
            index.name()
        );

        let ingestion =
            IngestionPipeline::new(&config.chunking, Arc::clone(&embedder), Arc::clone(&index))?;
        let query = QueryPipeline::new(embedder, index, generator, config.retrieval.top_k);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                ingestion,
                query,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn ingestion(&self) -> &IngestionPipeline {
        &self.inner.ingestion
    }

    /// Get the query pipeline
    pub fn query_pipeline(&self) -> &QueryPipeline {
        &self.inner.query
    }
}
