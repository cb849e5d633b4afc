//! Query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::query::ChatRequest;
use crate::types::response::AnswerRecord;

/// POST /chat - Answer a question over the indexed documents
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AnswerRecord>> {
    if request.query.trim().is_empty() {
        return Err(Error::validation("query cannot be empty"));
    }

    let start = Instant::now();
    tracing::info!("Query: \"{}\"", request.query);

    let record = state.query_pipeline().answer(&request.query).await?;

    tracing::info!(
        "Query answered in {}ms with {} sources",
        start.elapsed().as_millis(),
        record.sources.len()
    );

    Ok(Json(record))
}
