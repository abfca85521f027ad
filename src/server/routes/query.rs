//! Question answering and history endpoints

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::session::Turn;
use crate::types::query::QueryRequest;
use crate::types::response::Answer;

/// POST /api/query - ask a question about the live document
///
/// Fails fast while an ingestion is rebuilding the index rather than
/// queueing the request behind it.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Answer>> {
    if state.engine().is_rebuilding() {
        return Err(Error::IndexNotReady);
    }

    tracing::info!(question = %request.question, "query received");
    let answer = state.engine().ask_with(request).await?;
    Ok(Json(answer))
}

/// GET /api/history - the current session's turns in order
pub async fn history(State(state): State<AppState>) -> Json<Vec<Turn>> {
    Json(state.engine().history())
}
