mod config;
mod errors;
mod llm_client;
mod models;
mod report;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::screening::scoring::RoleWeights;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Ollama client (generation + embeddings share one HTTP pool)
    let ollama = Arc::new(OllamaClient::new(
        &config.ollama_url,
        &config.llm_model,
        &config.embedding_model,
        Duration::from_secs(config.request_timeout_secs),
    )?);
    info!(
        "Ollama client initialized (url: {}, model: {}, embeddings: {})",
        config.ollama_url,
        ollama.model(),
        ollama.embedding_model()
    );

    // Role weight table (built-in unless ROLE_WEIGHTS_PATH overrides it)
    let role_weights = match &config.role_weights_path {
        Some(path) => {
            let weights = RoleWeights::from_json_file(path)?;
            info!("Loaded role weights from {path}");
            weights
        }
        None => RoleWeights::default(),
    };
    info!(
        "Roles available: {}",
        role_weights
            .iter()
            .map(|(role, _)| role.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let chunker = config.chunker()?;
    info!(
        "Chunker: {} chars, {} overlap",
        chunker.chunk_size(),
        chunker.chunk_overlap()
    );

    // Build app state
    let state = AppState {
        llm: ollama.clone(),
        embedder: ollama,
        role_weights: Arc::new(role_weights),
        chunker,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
