//! Question embedding and top-K chunk retrieval

use std::sync::Arc;

use crate::error::Result;
use crate::providers::EmbeddingProvider;

use super::{DocumentState, RetrievalResult, ScoredChunk};

/// Retrieves the chunks most relevant to a question
///
/// Embeds the question through the gateway, queries the document's index,
/// and drops candidates below the relevance threshold. An empty result means
/// the document holds nothing relevant; the caller turns that into the
/// deterministic not-found answer.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Retrieve up to `k` chunks scoring at or above `threshold`
    pub async fn retrieve(
        &self,
        state: &DocumentState,
        question: &str,
        k: usize,
        threshold: f32,
    ) -> Result<RetrievalResult> {
        let query_vector = self.embedder.embed(question).await?;
        let scored = state.index.query(&query_vector, k)?;

        let hits: Vec<ScoredChunk> = scored
            .into_iter()
            .filter(|(_, score)| *score >= threshold)
            .map(|(chunk_index, score)| ScoredChunk {
                chunk: state.chunks[chunk_index as usize].clone(),
                score,
            })
            .collect();

        tracing::debug!(
            retrieved = hits.len(),
            requested = k,
            threshold,
            "retrieved chunks for question"
        );

        Ok(RetrievalResult { hits })
    }
}
