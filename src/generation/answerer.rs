//! Grounded answer generation with a deterministic refusal path

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::GenerationProvider;
use crate::retrieval::RetrievalResult;
use crate::session::Turn;
use crate::types::response::{Answer, Citation};

use super::citation::{extract_cited_chunks, strip_citation_tags, truncate_snippet};
use super::prompt::PromptBuilder;

/// Maximum snippet length carried in a citation
const SNIPPET_MAX_LEN: usize = 240;

/// Produces answers constrained to retrieved document context
///
/// The not-found case is decided here, locally: an empty retrieval result
/// returns the fixed refusal without ever calling the generation service.
pub struct GroundedAnswerer {
    llm: Arc<dyn GenerationProvider>,
    max_context_chars: usize,
    history_turns: usize,
}

impl GroundedAnswerer {
    /// Create a new answerer
    pub fn new(llm: Arc<dyn GenerationProvider>, config: &RetrievalConfig) -> Self {
        Self {
            llm,
            max_context_chars: config.max_context_chars,
            history_turns: config.history_turns,
        }
    }

    /// Answer a question from the retrieved chunks
    ///
    /// Citations are always a subset of the chunk indices supplied to the
    /// generation service as context.
    pub async fn answer(
        &self,
        question: &str,
        result: &RetrievalResult,
        history: &[Turn],
    ) -> Result<Answer> {
        if result.is_empty() {
            tracing::info!("no relevant chunks; returning not-found answer");
            return Ok(Answer::not_found());
        }

        let (context, supplied) = PromptBuilder::build_context(result, self.max_context_chars);

        let recent_start = history.len().saturating_sub(self.history_turns);
        let prompt = PromptBuilder::build_prompt(question, &context, &history[recent_start..]);

        let raw = self.llm.generate(&prompt).await?;

        let cited = extract_cited_chunks(&raw, &supplied);
        let citations: Vec<Citation> = result
            .hits
            .iter()
            .filter(|hit| cited.contains(&hit.chunk.index))
            .map(|hit| Citation {
                chunk_index: hit.chunk.index,
                snippet: truncate_snippet(&hit.chunk.text, SNIPPET_MAX_LEN),
                score: hit.score,
            })
            .collect();

        Ok(Answer {
            text: strip_citation_tags(&raw),
            citations,
            grounded: true,
        })
    }
}
