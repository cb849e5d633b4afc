//! Document segment types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum characters of segment text stored as the indexed preview
pub const EXCERPT_MAX_CHARS: usize = 500;

/// A bounded span of a document's extracted text, the atomic unit of
/// embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Deterministic id derived from the owning document and ordinal, so
    /// re-ingesting a document replaces its prior segments on upsert
    pub id: String,
    /// Owning document
    pub document_id: Uuid,
    /// Zero-based position within the document
    pub ordinal: u32,
    /// Segment text
    pub text: String,
    /// Embedding vector; empty until the embedding provider fills it
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

impl Segment {
    /// Create a new segment without an embedding
    pub fn new(document_id: Uuid, ordinal: u32, text: String) -> Self {
        Self {
            id: Self::segment_id(&document_id, ordinal),
            document_id,
            ordinal,
            text,
            embedding: Vec::new(),
        }
    }

    /// Deterministic segment id for a document and ordinal
    pub fn segment_id(document_id: &Uuid, ordinal: u32) -> String {
        format!("{}_chunk_{}", document_id, ordinal)
    }

    /// Id prefix shared by every segment of a document
    pub fn id_prefix(document_id: &Uuid) -> String {
        format!("{}_chunk_", document_id)
    }
}

/// Metadata stored alongside each vector in the index. The index is the
/// system of record; everything retrieval needs must be here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentMetadata {
    /// Owning document
    pub document_id: Uuid,
    /// Zero-based position within the document
    pub ordinal: u32,
    /// Display name of the document, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Segment text excerpt, truncated to [`EXCERPT_MAX_CHARS`]
    pub text: String,
}

impl SegmentMetadata {
    /// Build metadata for a segment, truncating the text preview
    pub fn from_segment(segment: &Segment, title: Option<&str>) -> Self {
        Self {
            document_id: segment.document_id,
            ordinal: segment.ordinal,
            title: title.map(|t| t.to_string()),
            text: truncate_chars(&segment.text, EXCERPT_MAX_CHARS),
        }
    }
}

/// Truncate a string to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_is_deterministic() {
        let doc = Uuid::new_v4();
        let a = Segment::new(doc, 3, "text".to_string());
        let b = Segment::new(doc, 3, "other".to_string());
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, format!("{}_chunk_3", doc));
        assert!(a.id.starts_with(&Segment::id_prefix(&doc)));
    }

    #[test]
    fn test_excerpt_truncation_respects_char_boundaries() {
        let doc = Uuid::new_v4();
        let text = "é".repeat(EXCERPT_MAX_CHARS + 10);
        let segment = Segment::new(doc, 0, text);
        let meta = SegmentMetadata::from_segment(&segment, None);
        assert_eq!(meta.text.chars().count(), EXCERPT_MAX_CHARS);
    }
}
