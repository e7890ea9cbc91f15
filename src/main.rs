//! K360 Admin - administrative web console for the K360 cycle-tracking app

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use k360_admin::{
    backend::BackendClient,
    config::Config,
    services::SnapshotStore,
    web::{self, AppState, Renderer},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "k360_admin=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting K360 admin console...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded, backend at {}", config.backend.base_url);

    // Backend REST client
    let backend = BackendClient::new(&config.backend)?;
    tracing::info!("Backend client initialized");

    // Per-session list snapshots
    let snapshots = SnapshotStore::new(&config.snapshot);

    // Template engine
    let renderer = Renderer::new(&config.server.templates_dir)?;
    tracing::info!("Templates loaded from {}", config.server.templates_dir);

    // Build application state
    let state = AppState {
        config: Arc::new(config.clone()),
        backend: Arc::new(backend),
        snapshots,
        renderer: Arc::new(renderer),
    };

    // Build router
    let app = web::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Console listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
