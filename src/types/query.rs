//! Query request types

use serde::{Deserialize, Serialize};

/// Query request for a question against the current document
///
/// `top_k` and `similarity_threshold` override the configured defaults when
/// set; both are tunables rather than fixed constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve (default: configured value)
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Minimum similarity for a chunk to count as relevant (0.0-1.0)
    #[serde(default)]
    pub similarity_threshold: Option<f32>,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: None,
            similarity_threshold: None,
        }
    }

    /// Set the number of chunks to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set the similarity threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }
}
