//! Generation provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for the answer-generation service
///
/// The caller builds the full prompt, including retrieved context and
/// grounding instructions; the provider only completes it.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
