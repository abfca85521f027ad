//! Configuration for the question-answering pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.embedding.dimensions == 0 {
            return Err(Error::config("embedding.dimensions must be positive"));
        }
        self.retrieval.validate()?;
        if self.llm.timeout_secs == 0 {
            return Err(Error::config("llm.timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_body_bytes: 10 * 1024 * 1024, // 10MB of extracted text
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
    /// How far back from the window edge to look for a natural break
    pub boundary_lookback: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            boundary_lookback: 20,
        }
    }
}

impl ChunkingConfig {
    /// Validate chunking parameters
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunking.chunk_size must be positive"));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::config(format!(
                "chunking.overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to count as relevant
    pub similarity_threshold: f32,
    /// Character budget for retrieved context in the prompt
    pub max_context_chars: usize,
    /// How many recent turns to include for conversational coherence
    pub history_turns: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 8,
            similarity_threshold: 0.25,
            max_context_chars: 9000,
            history_turns: 3,
        }
    }
}

impl RetrievalConfig {
    /// Validate retrieval parameters
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::config("retrieval.top_k must be positive"));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::config(format!(
                "retrieval.similarity_threshold ({}) must be within [0.0, 1.0]",
                self.similarity_threshold
            )));
        }
        if self.max_context_chars == 0 {
            return Err(Error::config("retrieval.max_context_chars must be positive"));
        }
        Ok(())
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed service requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.1:8b".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}
