//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A document that has been ingested
///
/// Immutable once created; replaced wholesale when a new document is
/// uploaded. Only one document is live at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Display name (typically the uploaded filename)
    pub name: String,
    /// Raw extracted text
    pub text: String,
    /// SHA-256 of the text, used to skip re-ingesting identical content
    pub content_hash: String,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document from extracted text
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content_hash: content_hash(&text),
            text,
            ingested_at: Utc::now(),
        }
    }
}

/// Hash document text for deduplication
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// A contiguous slice of document text, the unit of retrieval
///
/// The sequential `index` is the chunk's identifier throughout the
/// pipeline: index entries, retrieval results, and citations all refer to
/// chunks by it. Offsets are character offsets into the source text, end
/// exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk within the document, starting at 0
    pub index: u32,
    /// First character of the chunk in the source text
    pub char_start: usize,
    /// One past the last character of the chunk
    pub char_end: usize,
    /// Text content
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: u32, char_start: usize, char_end: usize, text: String) -> Self {
        Self {
            index,
            char_start,
            char_end,
            text,
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.char_end - self.char_start
    }

    /// Whether the chunk is empty
    pub fn is_empty(&self) -> bool {
        self.char_start == self.char_end
    }
}
