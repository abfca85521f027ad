//! API route registration

pub mod document;
pub mod query;

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use super::state::AppState;

/// Build the /api router
pub fn api_routes(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/document",
            post(document::submit).delete(document::reset),
        )
        .route("/query", post(query::ask))
        .route("/history", get(query::history))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
}
