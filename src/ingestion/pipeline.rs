//! Ingestion pipeline orchestration
//!
//! Extract → chunk → embed → upsert, producing a stable per-document id.
//! Updates are observably delete-then-insert: old segments are removed before
//! the new batch is written, and both steps run under a per-document lock so
//! concurrent writes to one document serialize.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::providers::{
    vector_index::VectorRecord, EmbeddingProvider, VectorIndexProvider,
};
use crate::types::document::{Segment, SegmentMetadata};

use super::chunker::Chunker;
use super::extractor;

/// Main ingestion pipeline. Holds dependency-injected client handles; safe to
/// share across concurrent requests.
pub struct IngestionPipeline {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    /// Per-document write locks serializing delete-then-upsert sequences
    write_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl IngestionPipeline {
    /// Create a new ingestion pipeline.
    ///
    /// Fails with a configuration error when the chunking settings are
    /// invalid (`chunk_overlap >= chunk_size`).
    pub fn new(
        chunking: &ChunkingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Result<Self> {
        let chunker = Chunker::new(chunking.chunk_size, chunking.chunk_overlap)?;
        Ok(Self {
            chunker,
            embedder,
            index,
            write_locks: DashMap::new(),
        })
    }

    /// Ingest a PDF byte stream.
    ///
    /// With `existing` set this is an update: segments currently stored under
    /// that id are deleted before the new ones are inserted (an unknown id
    /// simply creates fresh segments). Returns the document id — freshly
    /// generated for new ingestion, echoed back for updates. An empty or
    /// unextractable document succeeds with zero segments.
    pub async fn ingest(
        &self,
        raw: &[u8],
        title: Option<&str>,
        existing: Option<Uuid>,
    ) -> Result<Uuid> {
        let text = extractor::extract(raw)?;
        self.ingest_text(&text, title, existing).await
    }

    /// Ingest already-extracted text. Chunking, embedding, and indexing only;
    /// the format validation of [`Self::ingest`] does not apply.
    pub async fn ingest_text(
        &self,
        text: &str,
        title: Option<&str>,
        existing: Option<Uuid>,
    ) -> Result<Uuid> {
        let document_id = existing.unwrap_or_else(Uuid::new_v4);

        let segments = self.build_segments(document_id, text).await?;
        let records: Vec<VectorRecord> = segments
            .iter()
            .map(|segment| VectorRecord {
                id: segment.id.clone(),
                values: segment.embedding.clone(),
                metadata: SegmentMetadata::from_segment(segment, title),
            })
            .collect();

        if existing.is_some() {
            let lock = self.write_lock(document_id);
            let _guard = lock.lock().await;

            let removed = self.index.delete_by_document(&document_id).await?;
            tracing::info!(
                "Updating document {}: removed {} old segments",
                document_id,
                removed
            );

            if !records.is_empty() {
                // Old segments are already gone; a failure here leaves the
                // document empty and must be surfaced as such.
                self.index
                    .upsert(&records)
                    .await
                    .map_err(|e| Error::PartialFailure {
                        document_id,
                        message: e.to_string(),
                    })?;
            }
        } else if !records.is_empty() {
            self.index.upsert(&records).await?;
        }

        tracing::info!(
            "Ingested document {} ({} segments)",
            document_id,
            records.len()
        );

        Ok(document_id)
    }

    /// Delete all segments of a document.
    ///
    /// Returns whether any segments existed; `false` maps to not-found at the
    /// boundary.
    pub async fn delete(&self, document_id: Uuid) -> Result<bool> {
        let lock = self.write_lock(document_id);
        let _guard = lock.lock().await;

        let removed = self.index.delete_by_document(&document_id).await?;
        tracing::info!("Deleted {} segments for document {}", removed, document_id);

        Ok(removed > 0)
    }

    /// Chunk text and embed all segments in one batch call. Zero segments
    /// short-circuits without touching the embedding provider.
    async fn build_segments(&self, document_id: Uuid, text: &str) -> Result<Vec<Segment>> {
        let pieces = self.chunker.chunk(text);

        let mut segments: Vec<Segment> = pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| Segment::new(document_id, i as u32, piece))
            .collect();

        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != segments.len() {
            return Err(Error::upstream(
                crate::error::Stage::Embedding,
                format!(
                    "expected {} embeddings, got {}",
                    segments.len(),
                    embeddings.len()
                ),
            ));
        }

        for (segment, embedding) in segments.iter_mut().zip(embeddings) {
            segment.embedding = embedding;
        }

        Ok(segments)
    }

    fn write_lock(&self, document_id: Uuid) -> Arc<Mutex<()>> {
        self.write_locks.entry(document_id).or_default().clone()
    }
}
