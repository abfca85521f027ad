//! Provider abstractions for the embedding and generation services
//!
//! The pipeline only ever talks to the two external services through these
//! traits, so any provider (local Ollama, a hosted API, a test double) can
//! be substituted behind the same contract.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::GenerationProvider;
pub use ollama::OllamaClient;
