mod analysis;
mod config;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::registry::JobRegistry;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{crate_name}={level},tower_http={level}",
                crate_name = env!("CARGO_PKG_NAME").replace('-', "_"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    let gemini = GeminiClient::from_config(&config)?;
    info!("Gemini client initialized (endpoint: {})", gemini.api_url());
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; analyze requests will fail until it is configured");
    }
    if config.gemini_timeout.is_none() {
        warn!("GEMINI_TIMEOUT_SECS is not set; a stalled Gemini call blocks its request indefinitely");
    }

    let state = AppState {
        jobs: JobRegistry::new(),
        generator: Arc::new(gemini),
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
