//! Collaborator abstractions for embeddings, generation, and vector storage
//!
//! The pipelines depend only on these traits; concrete clients are injected
//! at construction so test doubles can stand in.

pub mod embedding;
pub mod generation;
pub mod memory;
pub mod openai;
pub mod pinecone;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use generation::GenerationProvider;
pub use memory::InMemoryIndex;
pub use openai::{OpenAiEmbedder, OpenAiGenerator};
pub use pinecone::PineconeIndex;
pub use vector_index::{DistanceMetric, ScoredMatch, VectorIndexProvider, VectorRecord};
