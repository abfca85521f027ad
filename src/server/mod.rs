//! HTTP server exposing the question-answering engine

pub mod routes;
pub mod state;

use axum::http::StatusCode;
use axum::{extract::State, routing::get, Json, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::types::response::EngineStatus;
use state::AppState;

/// HTTP server wrapping a [`crate::RagEngine`]
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new server
    pub fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes
    fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .route("/status", get(status))
            .nest(
                "/api",
                routes::api_routes(self.config.server.max_body_bytes),
            )
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| Error::config(format!("invalid address: {e}")))?;

        let router = self.build_router();

        tracing::info!("starting server on http://{addr}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::config(format!("failed to bind: {e}")))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::config(format!("server error: {e}")))?;

        Ok(())
    }

    /// The address the server will bind to
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Liveness endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness endpoint: 503 until a document is ingested and indexed
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.engine().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Engine status endpoint
async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine().status())
}
