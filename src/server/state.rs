//! Application state shared across request handlers

use std::sync::Arc;

use crate::config::RagConfig;
use crate::engine::RagEngine;
use crate::error::Result;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RagEngine>,
}

impl AppState {
    /// Create new application state with an Ollama-backed engine
    pub fn new(config: RagConfig) -> Result<Self> {
        let engine = Arc::new(RagEngine::new(config)?);
        Ok(Self { engine })
    }

    /// Wrap an existing engine
    pub fn from_engine(engine: Arc<RagEngine>) -> Self {
        Self { engine }
    }

    /// The underlying engine
    pub fn engine(&self) -> &RagEngine {
        &self.engine
    }
}
