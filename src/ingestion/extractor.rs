//! PDF text extraction

use crate::error::{Error, Result};

/// Separator inserted between per-page texts
pub const PAGE_SEPARATOR: &str = "\n";

/// Extract plain text from a PDF byte stream.
///
/// Rejects byte streams that are not well-formed PDFs with
/// [`Error::UnsupportedFormat`]. Individual page failures degrade to an empty
/// string for that page rather than aborting the document; a document with no
/// extractable text yields an empty string, not an error.
pub fn extract(raw: &[u8]) -> Result<String> {
    // Well-formedness gate: anything lopdf cannot load is not a PDF we handle.
    let doc = lopdf::Document::load_mem(raw)
        .map_err(|e| Error::unsupported_format(format!("not a well-formed PDF: {}", e)))?;

    let text = match pdf_extract::extract_text_from_mem_by_pages(raw) {
        Ok(pages) => pages.join(PAGE_SEPARATOR),
        Err(e) => {
            tracing::warn!("pdf-extract failed ({}), falling back to per-page extraction", e);
            extract_pages_fallback(&doc)
        }
    };

    if text.trim().is_empty() {
        return Ok(String::new());
    }

    Ok(text)
}

/// Per-page extraction via lopdf. A page that fails to extract contributes an
/// empty string, preserving document order for the pages around it.
fn extract_pages_fallback(doc: &lopdf::Document) -> String {
    let mut pages_text = Vec::new();

    for (page_number, _object_id) in doc.get_pages() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages_text.push(text),
            Err(e) => {
                tracing::warn!("extraction failed for page {}: {}", page_number, e);
                pages_text.push(String::new());
            }
        }
    }

    pages_text.join(PAGE_SEPARATOR)
}
