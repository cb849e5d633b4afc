//! RAG server binary
//!
//! Run with: cargo run --bin corpus-rag-server

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corpus_rag::config::{IndexBackend, RagConfig};
use corpus_rag::providers::{
    DistanceMetric, InMemoryIndex, OpenAiEmbedder, OpenAiGenerator, PineconeIndex,
    VectorIndexProvider,
};
use corpus_rag::server::{state::AppState, RagServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::load_default()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embedding.model);
    tracing::info!("  - Embedding dimensions: {}", config.embedding.dimensions);
    tracing::info!("  - Generation model: {}", config.generation.model);
    tracing::info!(
        "  - Chunking: size {} / overlap {}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let embedder = Arc::new(OpenAiEmbedder::new(&config.embedding)?);
    let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);

    let index: Arc<dyn VectorIndexProvider> = match config.vector_index.backend {
        IndexBackend::Pinecone => Arc::new(PineconeIndex::new(&config.vector_index)?),
        IndexBackend::Memory => Arc::new(InMemoryIndex::new()),
    };

    if let Err(e) = index
        .ensure_index(config.embedding.dimensions, DistanceMetric::Cosine)
        .await
    {
        tracing::warn!("Vector index setup failed: {}", e);
    }

    let state = AppState::new(config, embedder, generator, index)?;
    let server = RagServer::new(state);

    tracing::info!("API: http://{}", server.address());
    server.start().await?;

    Ok(())
}
