mod config;
mod errors;
mod generation;
mod identity;
mod llm_client;
mod models;
mod preferences;
mod recipes;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recipes::store::{RecipeStore, RedisBlobStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bucatar API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let conn = redis.get_multiplexed_async_connection().await?;
    let store = RecipeStore::new(Arc::new(RedisBlobStore::new(
        conn,
        config.storage_quota_bytes,
    )));
    info!(
        "Redis store initialized (quota {} bytes per blob)",
        config.storage_quota_bytes
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState::new(store, Arc::new(llm), config.clone());

    // Restore the signed-in profile's defaults into the fresh session
    if let Some(user) = state.store.current_user().await? {
        state
            .preferences
            .lock()
            .await
            .seed_from_profile(&user.preferences);
        info!("Resumed session for profile {}", user.id);
    }

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
