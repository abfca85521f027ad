//! Orchestration: document lifecycle, question pipeline, session state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::GroundedAnswerer;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, GenerationProvider, OllamaClient};
use crate::retrieval::{DocumentState, Retriever, VectorIndex};
use crate::session::{Session, Turn};
use crate::types::document::{content_hash, Document};
use crate::types::query::QueryRequest;
use crate::types::response::{Answer, DocumentSummary, EngineStatus, IngestReceipt};

/// Upper bound on per-request top_k overrides
const MAX_TOP_K: usize = 15;

/// The question-answering engine for a single document
///
/// Owns the live document, its index, and the conversation session.
/// Ingestion replaces all three atomically; questions are processed one at a
/// time, so two answers can never interleave their session writes.
pub struct RagEngine {
    config: RagConfig,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: Retriever,
    answerer: GroundedAnswerer,
    /// Live document plus index, swapped wholesale on ingestion
    state: RwLock<Option<Arc<DocumentState>>>,
    /// Conversation turns for the live document
    session: RwLock<Session>,
    /// Serializes ingestion and the ask pipeline: one operation at a time,
    /// so a question issued mid-rebuild blocks until the rebuild completes
    serial: Mutex<()>,
    /// True while an ingestion is rebuilding the index; lets the HTTP layer
    /// fail fast instead of queueing behind the rebuild
    rebuilding: AtomicBool,
}

/// Clears the rebuilding flag on every exit path of an ingestion
struct RebuildFlag<'a>(&'a AtomicBool);

impl<'a> RebuildFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RebuildFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RagEngine {
    /// Create an engine backed by Ollama for both services
    pub fn new(config: RagConfig) -> Result<Self> {
        let ollama = Arc::new(OllamaClient::new(&config.llm, config.embedding.dimensions)?);
        let embedder: Arc<dyn EmbeddingProvider> = ollama.clone();
        let llm: Arc<dyn GenerationProvider> = ollama;
        Self::with_providers(config, embedder, llm)
    }

    /// Create an engine with explicit service providers
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn GenerationProvider>,
    ) -> Result<Self> {
        config.validate()?;

        if embedder.dimensions() != config.embedding.dimensions {
            return Err(Error::config(format!(
                "embedding provider produces {}-dimensional vectors, config expects {}",
                embedder.dimensions(),
                config.embedding.dimensions
            )));
        }

        let chunker = TextChunker::from_config(&config.chunking);
        let retriever = Retriever::new(Arc::clone(&embedder));
        let answerer = GroundedAnswerer::new(llm, &config.retrieval);

        Ok(Self {
            config,
            chunker,
            embedder,
            retriever,
            answerer,
            state: RwLock::new(None),
            session: RwLock::new(Session::new()),
            serial: Mutex::new(()),
            rebuilding: AtomicBool::new(false),
        })
    }

    /// Ingest a document, replacing any previous one
    ///
    /// Chunks the text, embeds every chunk, builds the index, then swaps the
    /// new state into place and clears the session. All-or-nothing: on any
    /// failure the previous document stays fully queryable. Submitting text
    /// identical to the live document is a no-op.
    pub async fn submit_document(&self, name: &str, text: &str) -> Result<IngestReceipt> {
        let _serial = self.serial.lock().await;
        let started = Instant::now();

        let existing = {
            let guard = self.state.read();
            guard
                .as_ref()
                .filter(|s| s.document.content_hash == content_hash(text))
                .map(|s| (s.document.id, s.chunks.len()))
        };
        if let Some((document_id, chunk_count)) = existing {
            tracing::info!(%document_id, "submitted text matches live document, skipping");
            return Ok(IngestReceipt {
                document_id,
                name: name.to_string(),
                chunk_count,
                unchanged: true,
                processing_time_ms: started.elapsed().as_millis() as u64,
            });
        }

        let chunks = self.chunker.chunk(text)?;

        let _rebuild = RebuildFlag::raise(&self.rebuilding);

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        let index = VectorIndex::build(&chunks, vectors, self.config.embedding.dimensions)?;

        let document = Document::new(name, text);
        let document_id = document.id;
        let chunk_count = chunks.len();

        {
            let mut guard = self.state.write();
            *guard = Some(Arc::new(DocumentState {
                document,
                chunks,
                index,
            }));
        }
        self.session.write().clear();

        let processing_time_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            %document_id,
            chunk_count,
            processing_time_ms,
            "document ingested"
        );

        Ok(IngestReceipt {
            document_id,
            name: name.to_string(),
            chunk_count,
            unchanged: false,
            processing_time_ms,
        })
    }

    /// Answer a question from the live document
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.ask_with(QueryRequest::new(question)).await
    }

    /// Answer a question with per-request retrieval overrides
    ///
    /// The full pipeline (embed, retrieve, answer, record the turn) runs
    /// under one lock, so questions are strictly serialized. A turn is
    /// recorded only when the pipeline succeeds; service failures leave the
    /// session untouched.
    pub async fn ask_with(&self, request: QueryRequest) -> Result<Answer> {
        let _serial = self.serial.lock().await;
        let started = Instant::now();

        let state = {
            let guard = self.state.read();
            guard.as_ref().map(Arc::clone)
        }
        .ok_or(Error::NoDocument)?;

        let k = request
            .top_k
            .unwrap_or(self.config.retrieval.top_k)
            .clamp(1, MAX_TOP_K);
        let threshold = request
            .similarity_threshold
            .unwrap_or(self.config.retrieval.similarity_threshold);

        let result = self
            .retriever
            .retrieve(&state, &request.question, k, threshold)
            .await?;

        let history: Vec<Turn> = {
            let session = self.session.read();
            session
                .recent(self.config.retrieval.history_turns)
                .to_vec()
        };

        let answer = self
            .answerer
            .answer(&request.question, &result, &history)
            .await?;

        self.session
            .write()
            .append(Turn::from_answer(&request.question, &answer));

        tracing::info!(
            grounded = answer.grounded,
            citations = answer.citations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "question answered"
        );

        Ok(answer)
    }

    /// All turns of the current session, in order
    pub fn history(&self) -> Vec<Turn> {
        self.session.read().history().to_vec()
    }

    /// Drop the live document, its index, and the session
    pub fn reset(&self) {
        *self.state.write() = None;
        self.session.write().clear();
        tracing::info!("engine reset");
    }

    /// Whether a document is ingested and its index installed
    pub fn is_ready(&self) -> bool {
        !self.rebuilding.load(Ordering::SeqCst) && self.state.read().is_some()
    }

    /// Whether an ingestion is currently rebuilding the index
    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding.load(Ordering::SeqCst)
    }

    /// Current document and session summary
    pub fn status(&self) -> EngineStatus {
        let document = self.state.read().as_ref().map(|s| DocumentSummary {
            id: s.document.id,
            name: s.document.name.clone(),
            chunk_count: s.chunks.len(),
            ingested_at: s.document.ingested_at,
        });

        EngineStatus {
            ready: self.is_ready(),
            document,
            turns: self.session.read().len(),
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}
