//! Shared test doubles for the pipeline and server tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use corpus_rag::error::{Error, Result, Stage};
use corpus_rag::providers::{
    DistanceMetric, EmbeddingProvider, GenerationProvider, InMemoryIndex, ScoredMatch,
    VectorIndexProvider, VectorRecord,
};

/// Deterministic embedding derived from the text bytes
pub fn embedding_of(text: &str, dimensions: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dimensions];
    for (i, b) in text.bytes().enumerate() {
        v[i % dimensions] += b as f32;
    }
    v
}

/// Embedding double with a native batch endpoint; counts remote calls
pub struct StubEmbedder {
    pub dimensions: usize,
    pub remote_calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            remote_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.remote_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(embedding_of(text, self.dimensions))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| embedding_of(t, self.dimensions))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "stub-embedder"
    }
}

/// Embedding double that only implements the single-text call, exercising the
/// trait's default batch implementation
pub struct SingleOnlyEmbedder {
    pub dimensions: usize,
    pub remote_calls: AtomicUsize,
}

impl SingleOnlyEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            remote_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for SingleOnlyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(embedding_of(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "single-only-embedder"
    }
}

/// Generation double echoing a fixed answer
pub struct StubGenerator;

#[async_trait]
impl GenerationProvider for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("stub answer".to_string())
    }

    fn name(&self) -> &str {
        "stub-generator"
    }
}

/// Index wrapper whose upsert always fails; everything else delegates
pub struct FailingUpsertIndex {
    pub inner: Arc<InMemoryIndex>,
}

#[async_trait]
impl VectorIndexProvider for FailingUpsertIndex {
    async fn ensure_index(&self, dimensions: usize, metric: DistanceMetric) -> Result<()> {
        self.inner.ensure_index(dimensions, metric).await
    }

    async fn upsert(&self, _records: &[VectorRecord]) -> Result<()> {
        Err(Error::upstream(Stage::VectorIndex, "injected upsert failure"))
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        self.inner.query(vector, top_k).await
    }

    async fn delete_by_document(&self, document_id: &Uuid) -> Result<usize> {
        self.inner.delete_by_document(document_id).await
    }

    fn name(&self) -> &str {
        "failing-upsert"
    }
}

/// Build a minimal single-page PDF containing `text`
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize pdf");
    bytes
}
