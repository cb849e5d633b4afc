//! API routes for the RAG server

pub mod chat;
pub mod files;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Document management - with larger body limit for file uploads
        .route(
            "/files/add_file",
            post(files::add_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/files/update_file/:id",
            put(files::update_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/files/delete_file/:id", delete(files::delete_file))
        // Query
        .route("/chat", post(chat::chat))
        // Info
        .route("/", get(root))
}

/// Root endpoint
async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "message": "Welcome to the corpus-rag API!",
        "endpoints": {
            "POST /files/add_file": "Upload and ingest a PDF",
            "PUT /files/update_file/:id": "Re-ingest a PDF under an existing document id",
            "DELETE /files/delete_file/:id": "Delete a document's segments",
            "POST /chat": "Ask a question over the indexed documents"
        }
    }))
}
