//! Error types for the question-answering pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document text is empty or whitespace-only
    #[error("Document is empty or contains only whitespace")]
    EmptyDocument,

    /// A vector's length differs from the configured embedding dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// No document has been ingested yet
    #[error("No document has been ingested; upload a document first")]
    NoDocument,

    /// The index is being rebuilt and cannot serve queries
    #[error("The index is being rebuilt; retry once ingestion completes")]
    IndexNotReady,

    /// Embedding service failure (transport, quota)
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// Generation service failure
    #[error("Generation service error: {0}")]
    GenerationService(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding service error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingService(message.into())
    }

    /// Create a generation service error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationService(message.into())
    }

    /// Whether this error is a transient service failure worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingService(_) | Self::GenerationService(_) | Self::Http(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::EmptyDocument => (
                StatusCode::BAD_REQUEST,
                "empty_document",
                self.to_string(),
            ),
            Error::DimensionMismatch { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "dimension_mismatch",
                self.to_string(),
            ),
            Error::NoDocument => (StatusCode::NOT_FOUND, "no_document", self.to_string()),
            Error::IndexNotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "index_not_ready",
                self.to_string(),
            ),
            Error::EmbeddingService(msg) => {
                (StatusCode::BAD_GATEWAY, "embedding_error", msg.clone())
            }
            Error::GenerationService(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_error", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
