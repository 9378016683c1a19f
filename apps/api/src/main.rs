use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relevance_api::config::Config;
use relevance_api::embedding_client::EmbeddingClient;
use relevance_api::evaluation::EvaluationEngine;
use relevance_api::routes::build_router;
use relevance_api::scoring::semantic::{AbsentScorer, EmbeddingScorer, SemanticScorer};
use relevance_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("relevance_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Relevance API v{}", env!("CARGO_PKG_VERSION"));

    // An invalid policy must never reach the scorers.
    let policy = config.load_policy()?;
    info!(
        vocabulary = policy.skill_vocabulary.len(),
        degree_levels = policy.degree_levels.len(),
        fuzzy_threshold = policy.fuzzy_threshold,
        "Scoring policy loaded"
    );

    let semantic = build_semantic_scorer(&config)?;
    info!("Semantic scorer: {}", semantic.backend());

    let state = AppState {
        config: config.clone(),
        engine: Arc::new(EvaluationEngine::new(policy, semantic)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Embedding-backed scorer when an endpoint is configured, absent otherwise.
fn build_semantic_scorer(config: &Config) -> Result<Arc<dyn SemanticScorer>> {
    let Some(url) = &config.embedding_api_url else {
        return Ok(Arc::new(AbsentScorer));
    };

    let attempt_timeout = Duration::from_secs(config.embedding_timeout_secs);
    let client = EmbeddingClient::new(
        url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        attempt_timeout,
    )
    .context("Failed to build embedding HTTP client")?;
    info!(url = %url, model = %client.model(), "Embedding client initialized");

    Ok(Arc::new(EmbeddingScorer::new(Arc::new(client), attempt_timeout)))
}
