mod config;
mod errors;
mod llm_client;
mod report;
mod review;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::review::retry::RetryPolicy;
use crate::review::reviewer::CodeReviewer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Upload staging directory
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;
    info!("Staging uploads in {}", config.upload_dir.display());

    // Initialize LLM client (generation + embeddings)
    let llm = Arc::new(LlmClient::new(&config).context("Failed to build HTTP client")?);
    info!(
        "LLM client initialized (model: {}, embeddings: {})",
        llm.model(),
        llm.embedding_model()
    );

    let policy = RetryPolicy::default();
    info!(
        "Code review retry policy: {} attempts, {}s base delay",
        policy.max_attempts,
        policy.base_delay.as_secs()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        embedder: llm.clone(),
        reviewer: CodeReviewer::new(llm, policy),
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
