//! Sliding-window text chunking with natural-boundary snapping

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Text chunker with configurable window size and overlap
///
/// Slides a window of `chunk_size` characters over the text with stride
/// `chunk_size - overlap`. When the window edge falls mid-text, the cut is
/// moved back to the nearest sentence or whitespace boundary within
/// `boundary_lookback` characters, falling back to a hard character cut.
/// Every character of the source belongs to at least one chunk, and the
/// non-overlapping spans concatenate back to the original text.
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
    boundary_lookback: usize,
}

impl TextChunker {
    /// Create a new chunker; parameters must already satisfy
    /// `ChunkingConfig::validate`
    pub fn new(chunk_size: usize, overlap: usize, boundary_lookback: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            boundary_lookback,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.overlap, config.boundary_lookback)
    }

    /// Split text into overlapping chunks
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        // Byte position of each character, so all arithmetic below is in
        // character offsets while slicing stays on valid UTF-8 boundaries.
        let byte_of: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        let total = byte_of.len();

        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let mut end = hard_end;

            if hard_end < total {
                if let Some(boundary) = self.snap_to_boundary(text, &byte_of, start, hard_end) {
                    end = boundary;
                }
            }

            chunks.push(Chunk::new(
                chunks.len() as u32,
                start,
                end,
                slice_chars(text, &byte_of, start, end).to_string(),
            ));

            if end == total {
                break;
            }
            start = end - self.overlap;
        }

        tracing::debug!(
            chunks = chunks.len(),
            chars = total,
            "chunked document text"
        );

        Ok(chunks)
    }

    /// Find a natural cut point near the window edge
    ///
    /// Looks at the last `boundary_lookback` characters of the window,
    /// preferring the latest sentence bound, then the latest whitespace.
    /// A candidate only counts if the shortened window still advances the
    /// next start past the current one; otherwise the caller hard-cuts.
    fn snap_to_boundary(
        &self,
        text: &str,
        byte_of: &[usize],
        start: usize,
        hard_end: usize,
    ) -> Option<usize> {
        let look_start = hard_end.saturating_sub(self.boundary_lookback).max(start);
        let window = &text[byte_of[look_start]..byte_of[hard_end]];
        let min_boundary = start + self.overlap;

        let to_char_offset = |bytes: usize| look_start + window[..bytes].chars().count();

        let mut sentence_cut = None;
        for (offset, _) in window.split_sentence_bound_indices() {
            if offset > 0 {
                sentence_cut = Some(offset);
            }
        }
        if let Some(boundary) = sentence_cut.map(to_char_offset) {
            if boundary > min_boundary {
                return Some(boundary);
            }
        }

        let whitespace_cut = window
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(offset, c)| offset + c.len_utf8());
        if let Some(boundary) = whitespace_cut.map(to_char_offset) {
            if boundary > min_boundary {
                return Some(boundary);
            }
        }

        None
    }
}

/// Slice text by character offsets; `to` may equal the character count
fn slice_chars<'a>(text: &'a str, byte_of: &[usize], from: usize, to: usize) -> &'a str {
    let start = byte_of[from];
    let end = if to == byte_of.len() {
        text.len()
    } else {
        byte_of[to]
    };
    &text[start..end]
}
