//! Answer and receipt types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed answer text returned when the document does not contain the answer
pub const NOT_FOUND_ANSWER: &str =
    "The answer to this question is not present in the uploaded document.";

/// Citation pointing at a chunk of the current document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Chunk index within the document
    pub chunk_index: u32,
    /// Snippet of the cited chunk
    pub snippet: String,
    /// Similarity score of the chunk for this question (0.0-1.0)
    pub score: f32,
}

/// Answer to a question
///
/// `grounded` is false exactly when the retrieval step found nothing
/// relevant and the fixed refusal was returned without consulting the
/// generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text
    pub text: String,
    /// Chunks the answer is grounded in; always a subset of the chunks
    /// supplied to the generation step
    pub citations: Vec<Citation>,
    /// Whether the answer is backed by retrieved document content
    pub grounded: bool,
}

impl Answer {
    /// The deterministic refusal for questions the document cannot answer
    pub fn not_found() -> Self {
        Self {
            text: NOT_FOUND_ANSWER.to_string(),
            citations: Vec::new(),
            grounded: false,
        }
    }

    /// Indices of the cited chunks
    pub fn cited_chunks(&self) -> Vec<u32> {
        self.citations.iter().map(|c| c.chunk_index).collect()
    }
}

/// Receipt returned after submitting a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Document ID
    pub document_id: Uuid,
    /// Document display name
    pub name: String,
    /// Number of chunks created
    pub chunk_count: usize,
    /// True when the submitted text matched the live document and nothing
    /// was re-ingested
    pub unchanged: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Summary of the live document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID
    pub id: Uuid,
    /// Document display name
    pub name: String,
    /// Number of chunks in the index
    pub chunk_count: usize,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

/// Engine status for health and readiness reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether a document is ingested and its index installed
    pub ready: bool,
    /// The live document, if any
    pub document: Option<DocumentSummary>,
    /// Number of turns in the current session
    pub turns: usize,
}
