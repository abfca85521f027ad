//! Similarity indexing and top-K retrieval

mod index;
mod retriever;

pub use index::VectorIndex;
pub use retriever::Retriever;

use crate::types::{Chunk, Document};

/// Everything the engine knows about the live document
///
/// Built as a whole during ingestion and swapped into place atomically, so
/// queries never observe a document without its fully built index.
pub struct DocumentState {
    /// The ingested document
    pub document: Document,
    /// All chunks, ordered by index
    pub chunks: Vec<Chunk>,
    /// Similarity index over the chunks
    pub index: VectorIndex,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the question (0.0-1.0, higher is better)
    pub score: f32,
}

/// Ordered retrieval output, best match first
///
/// May be empty: an empty result is the signal that the document does not
/// contain anything relevant, not an error.
#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    /// Scored chunks in descending score order
    pub hits: Vec<ScoredChunk>,
}

impl RetrievalResult {
    /// Whether nothing relevant was found
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of retrieved chunks
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Indices of the retrieved chunks, in result order
    pub fn chunk_indices(&self) -> Vec<u32> {
        self.hits.iter().map(|h| h.chunk.index).collect()
    }
}
