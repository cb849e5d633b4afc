//! Text chunking with separator-priority splitting and exact overlap
//!
//! The chunker walks the text with a window of `size` characters and cuts each
//! segment at the coarsest separator available in the window, so lexical units
//! break at paragraph, line, sentence, or word boundaries where possible.
//! Consecutive segments overlap by exactly `overlap` characters: concatenating
//! the segments with the first `overlap` characters of every segment after the
//! first removed reconstructs the input.

use crate::error::{Error, Result};

/// Split separators from coarsest to finest granularity. A plain character
/// boundary is the implicit last resort.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Deterministic text chunker. A pure function of (text, size, overlap).
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum segment size in characters
    size: usize,
    /// Overlap between adjacent segments in characters
    overlap: usize,
}

impl Chunker {
    /// Create a chunker, validating the configuration.
    ///
    /// `overlap` must be strictly less than `size`; this is checked here, at
    /// pipeline construction, not at call time.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("chunk_size must be greater than zero"));
        }
        if overlap >= size {
            return Err(Error::config(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Split `text` into ordered overlapping segments.
    ///
    /// Returns an empty vec for empty input. Segment order is the order of
    /// appearance in the source text.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char, with an end sentinel, so all window
        // arithmetic is in characters but slicing stays on byte boundaries.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = offsets.len() - 1;

        let mut segments = Vec::new();
        let mut start = 0usize;

        loop {
            let window_end = start.saturating_add(self.size).min(total);
            if window_end == total {
                segments.push(text[offsets[start]..offsets[total]].to_string());
                break;
            }

            let cut = self.cut_point(text, &offsets, start, window_end);
            segments.push(text[offsets[start]..offsets[cut]].to_string());
            start = cut - self.overlap;
        }

        segments
    }

    /// Choose the cut (exclusive char index) for one window.
    ///
    /// Prefers the coarsest separator whose last occurrence in the window
    /// still leaves new content beyond the overlap region; falls back to the
    /// raw window end when no separator qualifies.
    fn cut_point(&self, text: &str, offsets: &[usize], start: usize, window_end: usize) -> usize {
        let window = &text[offsets[start]..offsets[window_end]];

        for sep in SEPARATORS {
            if let Some(pos) = window.rfind(sep) {
                let cut_byte = offsets[start] + pos + sep.len();
                // Separators are ASCII, so this lands on a char boundary.
                let cut = match offsets.binary_search(&cut_byte) {
                    Ok(i) => i,
                    Err(_) => continue,
                };
                if cut > start + self.overlap {
                    return cut;
                }
            }
        }

        window_end
    }
}
