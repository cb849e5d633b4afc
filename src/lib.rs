//! corpus-rag: RAG service with PDF ingestion and vector-search-grounded answers
//!
//! This crate implements a retrieval-augmented generation service. Documents are
//! ingested as PDFs, chunked into overlapping segments, embedded, and stored in a
//! vector index. Queries are answered by embedding the query, retrieving the
//! nearest segments, and conditioning a language model on them.
//!
//! The embedding provider, generation provider, and vector index are external
//! collaborators behind traits in [`providers`]; the pipelines in [`ingestion`]
//! and [`query`] take them by dependency injection so test doubles can stand in.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod query;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result, Stage};
pub use types::{
    document::{Segment, SegmentMetadata},
    response::{AnswerRecord, RetrievedSegment, SourceRef},
};
