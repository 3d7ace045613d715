mod autofill;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod page;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::build_http_client;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{KvStore, MemoryKvStore, PgKvStore};

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

    info!("Starting AutoApply companion v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let store: Arc<dyn KvStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgKvStore::new(pool))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryKvStore::new())
        }
    };

    // Initialize the HTTP client used for LLM calls
    let http = build_http_client(Duration::from_secs(config.llm_timeout_secs))?;
    info!(
        "LLM client ready (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    // Build app state
    let state = AppState::new(store, http, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // extension origins are not known ahead of time

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
