//! End-to-end pipeline tests with deterministic service doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use docchat::config::RagConfig;
use docchat::providers::{EmbeddingProvider, GenerationProvider};
use docchat::types::response::NOT_FOUND_ANSWER;
use docchat::{Error, QueryRequest, RagEngine, Result};

/// Fixed vocabulary the embedder projects onto, one axis per word
const VOCAB: &[&str] = &[
    "sky", "blue", "grass", "green", "color", "capital", "france", "apple", "red", "banana",
    "yellow",
];

/// Deterministic bag-of-words embedder
///
/// Texts sharing vocabulary words get proportionally similar vectors, so
/// retrieval outcomes are exactly predictable in tests.
struct VocabEmbedder;

#[async_trait]
impl EmbeddingProvider for VocabEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        let mut vector = vec![0.0f32; VOCAB.len()];
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some(axis) = VOCAB.iter().position(|&w| w == token) {
                vector[axis] += 1.0;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        VOCAB.len()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "vocab"
    }
}

/// Canned generation provider that counts invocations
struct ScriptedLlm {
    reply: String,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for ScriptedLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Generation provider that always fails
struct FailingLlm;

#[async_trait]
impl GenerationProvider for FailingLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("model offline"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing"
    }
}

fn test_config() -> RagConfig {
    let mut config = RagConfig::default();
    config.chunking.chunk_size = 20;
    config.chunking.overlap = 5;
    config.embedding.dimensions = VOCAB.len();
    config.retrieval.similarity_threshold = 0.25;
    config
}

fn engine_with(llm: Arc<dyn GenerationProvider>) -> RagEngine {
    RagEngine::with_providers(test_config(), Arc::new(VocabEmbedder), llm).unwrap()
}

const SKY_DOC: &str = "The sky is blue. Grass is green.";

#[tokio::test]
async fn answers_question_grounded_in_document() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm.clone());

    let receipt = engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    assert!(receipt.chunk_count >= 2);
    assert!(!receipt.unchanged);

    let answer = engine.ask("What color is the sky?").await.unwrap();

    assert!(answer.grounded);
    assert!(answer.text.contains("blue"));
    assert_eq!(answer.cited_chunks(), vec![0]);
    assert!(answer.citations[0].snippet.contains("sky is blue"));
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn unanswerable_question_gets_deterministic_refusal() {
    let llm = ScriptedLlm::new("should never be generated");
    let engine = engine_with(llm.clone());

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();

    let answer = engine.ask("What is the capital of France?").await.unwrap();

    assert!(!answer.grounded);
    assert!(answer.citations.is_empty());
    assert_eq!(answer.text, NOT_FOUND_ANSWER);
    assert_eq!(llm.call_count(), 0, "generation service must not be called");
}

#[tokio::test]
async fn refusals_are_recorded_as_ungrounded_turns() {
    let llm = ScriptedLlm::new("unused");
    let engine = engine_with(llm);

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    engine.ask("What is the capital of France?").await.unwrap();

    let history = engine.history();
    assert_eq!(history.len(), 1);
    assert!(!history[0].grounded);
    assert!(history[0].citations.is_empty());
}

#[tokio::test]
async fn asking_before_ingestion_fails_with_no_document() {
    let engine = engine_with(ScriptedLlm::new("unused"));

    let err = engine.ask("anything?").await.unwrap_err();
    assert!(matches!(err, Error::NoDocument));
    assert!(!engine.is_ready());
}

#[tokio::test]
async fn empty_document_is_rejected() {
    let engine = engine_with(ScriptedLlm::new("unused"));

    let err = engine.submit_document("empty.txt", "   \n\t ").await.unwrap_err();
    assert!(matches!(err, Error::EmptyDocument));
    assert!(!engine.is_ready());
}

#[tokio::test]
async fn new_document_replaces_index_and_clears_session() {
    let llm = ScriptedLlm::new("It is yellow. [chunk 2]");
    let engine = engine_with(llm.clone());

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    engine.ask("What color is the sky?").await.unwrap();
    assert_eq!(engine.history().len(), 1);

    let second = "The apple is red. The banana is yellow.";
    let receipt = engine.submit_document("fruit.txt", second).await.unwrap();
    assert!(!receipt.unchanged);
    assert_eq!(engine.history().len(), 0, "session must be cleared");

    let answer = engine.ask("What is yellow?").await.unwrap();
    assert!(answer.grounded);
    for citation in &answer.citations {
        assert!(
            (citation.chunk_index as usize) < receipt.chunk_count,
            "citation must point into the new document"
        );
        assert!(!citation.snippet.contains("sky"));
    }
}

#[tokio::test]
async fn identical_resubmission_is_a_noop() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm);

    let first = engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    engine.ask("What color is the sky?").await.unwrap();

    let second = engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    assert!(second.unchanged);
    assert_eq!(second.document_id, first.document_id);
    assert_eq!(engine.history().len(), 1, "session survives a no-op resubmit");
}

#[tokio::test]
async fn generation_failure_leaves_session_unmodified() {
    let engine = engine_with(Arc::new(FailingLlm));

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();

    let err = engine.ask("What color is the sky?").await.unwrap_err();
    assert!(matches!(err, Error::GenerationService(_)));
    assert_eq!(engine.history().len(), 0, "no partial turn may be recorded");
}

#[tokio::test]
async fn per_request_threshold_override_can_force_refusal() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm.clone());

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();

    let request = QueryRequest::new("What color is the sky?").with_threshold(0.9);
    let answer = engine.ask_with(request).await.unwrap();

    assert!(!answer.grounded);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn zero_top_k_is_clamped_rather_than_rejected() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm);

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();

    let request = QueryRequest::new("What color is the sky?").with_top_k(0);
    let answer = engine.ask_with(request).await.unwrap();
    assert!(answer.grounded);
}

#[tokio::test]
async fn history_preserves_turn_order_and_content() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm);

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    engine.ask("What color is the sky?").await.unwrap();
    engine.ask("What is the capital of France?").await.unwrap();

    let history = engine.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].question, "What color is the sky?");
    assert!(history[0].grounded);
    assert_eq!(history[1].question, "What is the capital of France?");
    assert!(!history[1].grounded);
    assert!(history[0].asked_at <= history[1].asked_at);
}

#[tokio::test]
async fn reset_drops_document_and_session() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm);

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    engine.ask("What color is the sky?").await.unwrap();
    assert!(engine.is_ready());

    engine.reset();

    assert!(!engine.is_ready());
    assert!(engine.history().is_empty());
    assert!(matches!(
        engine.ask("anything?").await.unwrap_err(),
        Error::NoDocument
    ));
}

#[tokio::test]
async fn status_reflects_document_and_turns() {
    let llm = ScriptedLlm::new("The sky is blue. [chunk 0]");
    let engine = engine_with(llm);

    let before = engine.status();
    assert!(!before.ready);
    assert!(before.document.is_none());

    engine.submit_document("colors.txt", SKY_DOC).await.unwrap();
    engine.ask("What color is the sky?").await.unwrap();

    let after = engine.status();
    assert!(after.ready);
    let doc = after.document.unwrap();
    assert_eq!(doc.name, "colors.txt");
    assert!(doc.chunk_count >= 2);
    assert_eq!(after.turns, 1);
}

#[tokio::test]
async fn embedding_round_trip_scores_near_one() {
    // embed the same text twice and query one embedding against an index
    // built from the other; cosine similarity must be ~1.0
    let embedder = VocabEmbedder;
    let a = embedder.embed("the blue sky over green grass").await.unwrap();
    let b = embedder.embed("the blue sky over green grass").await.unwrap();

    let chunks = vec![docchat::Chunk::new(0, 0, 1, "x".to_string())];
    let index = docchat::retrieval::VectorIndex::build(&chunks, vec![a], VOCAB.len()).unwrap();
    let results = index.query(&b, 1).unwrap();
    assert!((results[0].1 - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn mismatched_provider_dimensions_are_rejected_at_construction() {
    let mut config = test_config();
    config.embedding.dimensions = VOCAB.len() + 1;

    let outcome = RagEngine::with_providers(
        config,
        Arc::new(VocabEmbedder),
        ScriptedLlm::new("unused"),
    );
    assert!(matches!(outcome, Err(Error::Config(_))));
}
