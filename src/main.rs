//! Service entry point

use anyhow::Context;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tapmatch::api::{build_router, AppState};
use tapmatch::cache::{run_sweeper, AnalysisCache};
use tapmatch::config::AppConfig;
use tapmatch::extraction::MenuExtractionClient;
use tapmatch::menu::service::MenuAnalysisService;
use tapmatch::store::InMemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(
        port = config.server.port,
        extraction_enabled = config.extraction.enabled,
        "starting tapmatch"
    );

    let cache = Arc::new(AnalysisCache::new(config.cache.ttl()));
    let client = Arc::new(
        MenuExtractionClient::new(config.extraction.clone())
            .map_err(|e| anyhow::anyhow!("failed to build extraction client: {e}"))?,
    );
    let store = Arc::new(InMemoryStore::new());

    let service = Arc::new(MenuAnalysisService::new(
        cache.clone(),
        client,
        store,
        config.scoring,
        config.cache.ttl(),
    ));

    // Process-owned cache sweeper, stopped on shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(run_sweeper(
        cache.clone(),
        config.cache.sweep_interval(),
        shutdown_rx,
    ));

    let router = build_router(AppState { service }, config.server.max_body_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server error")?;

    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
    info!("shutdown complete");

    Ok(())
}
