//! axe server binary
//!
//! Reads provider settings from the environment (optionally a `.env` file),
//! builds the analyzer once and serves it over HTTP.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axe_runtime::RuntimeConfig;
use axe_server::{AppState, router};
use spending_analyzer::SpendingAnalyzer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize model provider
    let config = RuntimeConfig::from_env()?;
    let provider = config.build_provider()?;
    tracing::info!(provider = %config.provider, model = %config.model, "Model provider configured");

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Model provider reachable"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Model provider not reachable - analyses will fail until it is");
        }
    }

    let analyzer = SpendingAnalyzer::new(provider.clone(), config.generation_options());

    let state = AppState {
        analyzer: Arc::new(analyzer),
        provider,
        provider_name: config.provider.to_string(),
        model: config.model.clone(),
    };

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("axe server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health       - Health check");
    tracing::info!("  GET  /api/models   - List available models");
    tracing::info!("  POST /api/analyze  - Analyze a spending event");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
