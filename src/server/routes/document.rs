//! Document ingestion endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::response::IngestReceipt;

/// Request body for document submission
#[derive(Debug, Deserialize)]
pub struct SubmitDocumentRequest {
    /// Display name for the document
    #[serde(default = "default_name")]
    pub name: String,
    /// Extracted document text
    pub text: String,
}

fn default_name() -> String {
    "document".to_string()
}

/// POST /api/document - ingest extracted document text
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitDocumentRequest>,
) -> Result<Json<IngestReceipt>> {
    tracing::info!(name = %request.name, chars = request.text.len(), "document submitted");
    let receipt = state
        .engine()
        .submit_document(&request.name, &request.text)
        .await?;
    Ok(Json(receipt))
}

/// DELETE /api/document - drop the live document and conversation
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.engine().reset();
    StatusCode::NO_CONTENT
}
