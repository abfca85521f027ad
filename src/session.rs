//! Conversation session: the ordered record of question/answer turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::response::Answer;

/// One completed question/answer exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// The question as asked
    pub question: String,
    /// The answer text
    pub answer: String,
    /// Indices of the chunks the answer cited
    pub citations: Vec<u32>,
    /// Whether the answer was grounded in retrieved content
    pub grounded: bool,
    /// When the question was asked
    pub asked_at: DateTime<Utc>,
}

impl Turn {
    /// Record a completed answer as a turn
    pub fn from_answer(question: impl Into<String>, answer: &Answer) -> Self {
        Self {
            question: question.into(),
            answer: answer.text.clone(),
            citations: answer.cited_chunks(),
            grounded: answer.grounded,
            asked_at: Utc::now(),
        }
    }
}

/// Ordered sequence of turns for the current document
///
/// Append-only during a conversation; cleared when a new document is
/// ingested or the session is reset.
#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<Turn>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed turn
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in order
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Drop all turns
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the session has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
