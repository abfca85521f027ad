//! docchat: question answering over a single uploaded document
//!
//! This crate implements the retrieval-augmented core of a document chatbot:
//! text is split into overlapping chunks, embedded, and indexed for cosine
//! similarity; each question retrieves the most relevant chunks and the
//! answer generation step is constrained to that retrieved context. When the
//! document does not contain the answer, the refusal is a local, deterministic
//! decision rather than something delegated to the language model.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
pub use session::{Session, Turn};
pub use types::{
    document::{Chunk, Document},
    query::QueryRequest,
    response::{Answer, Citation, IngestReceipt},
};
