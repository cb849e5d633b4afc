//! Error types for the RAG service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage that an upstream collaborator failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Embedding provider call
    Embedding,
    /// Generation provider call
    Generation,
    /// Vector index call
    VectorIndex,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Embedding => write!(f, "embedding"),
            Stage::Generation => write!(f, "generation"),
            Stage::VectorIndex => write!(f, "vector_index"),
        }
    }
}

/// RAG service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or empty caller input (client fault, never retried)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Byte stream is not a well-formed document of a supported type
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An external collaborator (embedding, generation, vector index) failed
    #[error("Upstream {stage} failure: {message}")]
    Upstream { stage: Stage, message: String },

    /// An update deleted old segments but failed to insert new ones; the
    /// document is left with zero segments and must be re-ingested
    #[error("Partial failure: document {document_id} left empty (old segments deleted, new upsert failed: {message})")]
    PartialFailure { document_id: Uuid, message: String },

    /// No segments exist for the given document
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported format error
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }

    /// Create an upstream failure attributed to a stage
    pub fn upstream(stage: Stage, message: impl Into<String>) -> Self {
        Self::Upstream {
            stage,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            Error::UnsupportedFormat(msg) => (
                StatusCode::BAD_REQUEST,
                "unsupported_format",
                msg.clone(),
            ),
            Error::Upstream { stage, message } => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                format!("{} stage failed: {}", stage, message),
            ),
            Error::PartialFailure { .. } => (
                StatusCode::BAD_GATEWAY,
                "partial_failure",
                self.to_string(),
            ),
            Error::DocumentNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("No segments found for document {}", id),
            ),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
