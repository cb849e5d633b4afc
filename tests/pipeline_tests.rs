//! End-to-end pipeline tests against the in-memory index and scripted
//! embedding/generation doubles

mod common;

use std::sync::Arc;

use uuid::Uuid;

use common::{
    embedding_of, pdf_with_text, FailingUpsertIndex, SingleOnlyEmbedder, StubEmbedder,
    StubGenerator,
};
use corpus_rag::config::ChunkingConfig;
use corpus_rag::error::Error;
use corpus_rag::ingestion::IngestionPipeline;
use corpus_rag::providers::{EmbeddingProvider, InMemoryIndex, VectorIndexProvider};
use corpus_rag::query::QueryPipeline;
use corpus_rag::types::document::Segment;

const DIMS: usize = 8;

fn chunking(size: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig {
        chunk_size: size,
        chunk_overlap: overlap,
    }
}

fn pipeline_with(
    config: ChunkingConfig,
) -> (IngestionPipeline, Arc<StubEmbedder>, Arc<InMemoryIndex>) {
    let embedder = Arc::new(StubEmbedder::new(DIMS));
    let index = Arc::new(InMemoryIndex::new());
    let pipeline = IngestionPipeline::new(&config, embedder.clone(), index.clone())
        .expect("valid chunking config");
    (pipeline, embedder, index)
}

#[test]
fn invalid_overlap_is_rejected_at_construction() {
    let embedder = Arc::new(StubEmbedder::new(DIMS));
    let index = Arc::new(InMemoryIndex::new());
    let result = IngestionPipeline::new(&chunking(8, 8), embedder, index);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn empty_document_yields_id_and_zero_segments() {
    let (pipeline, embedder, index) = pipeline_with(chunking(100, 10));

    let id = pipeline
        .ingest_text("", None, None)
        .await
        .expect("empty ingest succeeds");

    assert_eq!(index.len(), 0);
    assert_eq!(embedder.calls(), 0, "no remote embedding call for zero segments");
    assert!(!pipeline.delete(id).await.expect("delete"));
}

#[tokio::test]
async fn empty_batch_uses_no_remote_call_via_default_impl() {
    let embedder = SingleOnlyEmbedder::new(DIMS);
    let result = embedder.embed_batch(&[]).await.expect("empty batch");
    assert!(result.is_empty());
    assert_eq!(
        embedder.remote_calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn ingest_assigns_deterministic_segment_ids() {
    let (pipeline, _embedder, index) = pipeline_with(chunking(10, 2));

    let id = pipeline
        .ingest_text("aaaa bbbb cccc dddd eeee", Some("doc.pdf"), None)
        .await
        .expect("ingest");

    let ids = index.ids_for_document(&id);
    assert!(!ids.is_empty());
    for (i, segment_id) in ids.iter().enumerate() {
        assert_eq!(*segment_id, Segment::segment_id(&id, i as u32));
    }
}

#[tokio::test]
async fn update_replaces_segments_never_supersets() {
    let (pipeline, _embedder, index) = pipeline_with(chunking(10, 2));

    let id = pipeline
        .ingest_text("aaaa bbbb cccc dddd eeee ffff gggg", Some("doc.pdf"), None)
        .await
        .expect("initial ingest");
    let old_count = index.ids_for_document(&id).len();
    assert!(old_count > 1, "test needs multiple initial segments");

    let echoed = pipeline
        .ingest_text("tiny", Some("doc.pdf"), Some(id))
        .await
        .expect("update");
    assert_eq!(echoed, id);

    let ids = index.ids_for_document(&id);
    assert_eq!(ids, vec![Segment::segment_id(&id, 0)]);
    assert_eq!(index.len(), 1, "no stale segments survive the update");
}

#[tokio::test]
async fn update_of_unknown_id_creates_fresh_segments() {
    let (pipeline, _embedder, index) = pipeline_with(chunking(100, 10));

    let id = Uuid::new_v4();
    let echoed = pipeline
        .ingest_text("some text", Some("doc.pdf"), Some(id))
        .await
        .expect("update of unknown id succeeds");

    assert_eq!(echoed, id);
    assert_eq!(index.ids_for_document(&id).len(), 1);
}

#[tokio::test]
async fn delete_reports_not_found_then_success() {
    let (pipeline, _embedder, index) = pipeline_with(chunking(100, 10));

    let unknown = Uuid::new_v4();
    assert!(!pipeline.delete(unknown).await.expect("delete unknown"));

    let id = pipeline
        .ingest_text("some text to index", Some("doc.pdf"), None)
        .await
        .expect("ingest");
    assert!(pipeline.delete(id).await.expect("delete existing"));
    assert_eq!(index.ids_for_document(&id).len(), 0);
    assert!(!pipeline.delete(id).await.expect("second delete"));
}

#[tokio::test]
async fn failed_upsert_after_delete_surfaces_partial_failure() {
    let inner = Arc::new(InMemoryIndex::new());
    let embedder = Arc::new(StubEmbedder::new(DIMS));

    let good = IngestionPipeline::new(&chunking(100, 10), embedder.clone(), inner.clone())
        .expect("pipeline");
    let id = good
        .ingest_text("original content", Some("doc.pdf"), None)
        .await
        .expect("ingest");
    assert_eq!(inner.len(), 1);

    let failing_index = Arc::new(FailingUpsertIndex {
        inner: inner.clone(),
    });
    let failing = IngestionPipeline::new(&chunking(100, 10), embedder, failing_index)
        .expect("pipeline");

    let result = failing
        .ingest_text("replacement content", Some("doc.pdf"), Some(id))
        .await;

    match result {
        Err(Error::PartialFailure { document_id, .. }) => assert_eq!(document_id, id),
        other => panic!("expected PartialFailure, got {:?}", other),
    }
    // the documented partial-failure state: old segments are gone
    assert_eq!(inner.len(), 0);
}

#[tokio::test]
async fn query_sources_are_bounded_by_k_and_ordered_by_score() {
    let (pipeline, embedder, index) = pipeline_with(chunking(10, 2));

    for text in [
        "alpha beta gamma delta epsilon zeta",
        "one two three four five six seven",
        "red green blue cyan magenta yellow",
    ] {
        pipeline
            .ingest_text(text, Some("doc.pdf"), None)
            .await
            .expect("ingest");
    }
    let available = index.len();
    assert!(available > 4, "test needs more segments than top_k");

    let top_k = 4;
    let query = QueryPipeline::new(
        embedder.clone(),
        index.clone(),
        Arc::new(StubGenerator),
        top_k,
    );

    let record = query.answer("alpha beta").await.expect("answer");
    assert_eq!(record.sources.len(), top_k.min(available));

    // sources follow the index's descending-score ranking
    let matches = index
        .query(&embedding_of("alpha beta", DIMS), top_k)
        .await
        .expect("direct query");
    for pair in matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    let expected: Vec<String> = matches.into_iter().map(|m| m.id).collect();
    let got: Vec<String> = record.sources.into_iter().map(|s| s.segment_id).collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn empty_index_query_answers_with_no_sources() {
    let embedder = Arc::new(StubEmbedder::new(DIMS));
    let index = Arc::new(InMemoryIndex::new());
    let query = QueryPipeline::new(embedder, index, Arc::new(StubGenerator), 4);

    let record = query.answer("is anything indexed?").await.expect("answer");
    assert!(record.sources.is_empty());
    assert!(!record.answer.is_empty());
}

#[tokio::test]
async fn pdf_ingest_end_to_end() {
    let (pipeline, embedder, index) = pipeline_with(chunking(100, 10));

    let raw = pdf_with_text("Hello World from a real document");
    let id = pipeline
        .ingest(&raw, Some("hello.pdf"), None)
        .await
        .expect("pdf ingest");
    assert!(!index.ids_for_document(&id).is_empty());

    let query = QueryPipeline::new(embedder, index.clone(), Arc::new(StubGenerator), 4);
    let record = query.answer("hello world?").await.expect("answer");
    assert!(!record.sources.is_empty());
    assert_eq!(record.sources[0].document_id, id);
}

#[tokio::test]
async fn non_pdf_bytes_are_rejected() {
    let (pipeline, _embedder, _index) = pipeline_with(chunking(100, 10));
    let result = pipeline.ingest(b"plain text, not a pdf", None, None).await;
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
}
