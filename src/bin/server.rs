//! Document chat server binary
//!
//! Run with: cargo run --bin docchat-server [config.toml]

use docchat::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("loading configuration from {path}");
            RagConfig::from_file(&path)?
        }
        None => RagConfig::default(),
    };

    tracing::info!("configuration loaded");
    tracing::info!("  - embedding model: {}", config.embedding.model);
    tracing::info!("  - embedding dimensions: {}", config.embedding.dimensions);
    tracing::info!("  - generation model: {}", config.llm.generate_model);
    tracing::info!(
        "  - chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.overlap
    );

    // Check Ollama before serving so a missing backend is obvious at startup
    tracing::info!("checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.embedding.model,
                config.llm.generate_model
            );
        }
    }

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/document - Upload extracted document text");
    println!("  POST   /api/query    - Ask a question");
    println!("  GET    /api/history  - Conversation so far");
    println!("  DELETE /api/document - Reset document and conversation");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
