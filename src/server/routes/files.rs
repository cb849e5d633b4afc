//! Document ingestion endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::response::{DeleteResponse, IngestResponse};

/// POST /files/add_file - Upload and ingest a new PDF
pub async fn add_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    let (filename, data) = read_upload(multipart).await?;
    require_pdf(&filename)?;

    tracing::info!("Ingesting file: {} ({} bytes)", filename, data.len());

    let file_id = state
        .ingestion()
        .ingest(&data, Some(&filename), None)
        .await?;

    Ok(Json(IngestResponse {
        file_id,
        message: "PDF ingested and vectors stored".to_string(),
    }))
}

/// PUT /files/update_file/:id - Re-ingest a PDF under an existing document id.
/// An unknown id is not rejected; it simply creates fresh segments under
/// that id.
pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    let (filename, data) = read_upload(multipart).await?;
    require_pdf(&filename)?;

    tracing::info!("Updating document {} from {} ({} bytes)", id, filename, data.len());

    let file_id = state
        .ingestion()
        .ingest(&data, Some(&filename), Some(id))
        .await?;

    Ok(Json(IngestResponse {
        file_id,
        message: "File updated and vectors replaced".to_string(),
    }))
}

/// DELETE /files/delete_file/:id - Delete all segments of a document
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    if !state.ingestion().delete(id).await? {
        return Err(Error::DocumentNotFound(id));
    }

    Ok(Json(DeleteResponse {
        file_id: id,
        message: "Vectors deleted".to_string(),
    }))
}

/// Read the first file field from a multipart upload
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("failed to read multipart field: {}", e)))?
    {
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("failed to read file: {}", e)))?;

        return Ok((filename, data.to_vec()));
    }

    Err(Error::validation("no file field in upload"))
}

/// Reject uploads that are not PDFs by filename
fn require_pdf(filename: &str) -> Result<()> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(Error::unsupported_format("only PDF files are supported"));
    }
    Ok(())
}
