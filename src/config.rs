//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main RAG service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Generation provider configuration
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Vector index configuration
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. Environment overrides for secrets are applied last.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `CORPUS_RAG_CONFIG` if set, else `corpus-rag.toml`, else defaults
    pub fn load_default() -> Result<Self> {
        let path = std::env::var("CORPUS_RAG_CONFIG")
            .unwrap_or_else(|_| "corpus-rag.toml".to_string());
        Self::load(Path::new(&path))
    }

    /// Apply environment variable overrides for credentials
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if self.embedding.api_key.is_none() {
                self.embedding.api_key = Some(key.clone());
            }
            if self.generation.api_key.is_none() {
                self.generation.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("VECTOR_INDEX_API_KEY") {
            if self.vector_index.api_key.is_none() {
                self.vector_index.api_key = Some(key);
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding API
    pub base_url: String,
    /// API key (usually supplied via OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions; must match the vector index's configured dimension
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            timeout_secs: 60,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target segment size in characters
    pub chunk_size: usize,
    /// Overlap between adjacent segments in characters; must be strictly
    /// less than `chunk_size`
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of segments to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: crate::query::DEFAULT_TOP_K,
        }
    }
}

/// Generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the chat completion API
    pub base_url: String,
    /// API key (usually supplied via OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// Maximum tokens in the generated answer
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 600,
            timeout_secs: 120,
        }
    }
}

/// Vector index backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Managed Pinecone-style HTTP index
    #[default]
    Pinecone,
    /// In-process index (local runs and tests)
    Memory,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorIndexConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: IndexBackend,
    /// API key (usually supplied via VECTOR_INDEX_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Control-plane URL for index management
    pub control_url: String,
    /// Data-plane host for the index, if already known; discovered via
    /// `ensure_index` otherwise
    #[serde(default)]
    pub index_host: Option<String>,
    /// Index name
    pub index_name: String,
    /// Serverless cloud provider
    pub cloud: String,
    /// Serverless region
    pub region: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackend::Pinecone,
            api_key: None,
            control_url: "https://api.pinecone.io".to_string(),
            index_host: None,
            index_name: "rag-app-index".to_string(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            timeout_secs: 30,
        }
    }
}
