/**
 * FAIRGO KERNEL - Point d'entrée du serveur snapshot live
 *
 * RÔLE : Bootstrap config -> feed client -> snapshot service -> API HTTP.
 *
 * ARCHITECTURE : Proxy du flux citybik.es, normalisation en snapshot canonique
 * (12 stations max + totaux) servi sur /api/live avec dégradation gracieuse.
 */

mod config;
mod feed;
mod health;
mod http;
mod models;
mod normalize;
mod snapshot;

use crate::config::load_config;
use crate::feed::FeedClient;
use crate::health::HealthTracker;
use crate::http::AppState;
use crate::snapshot::SnapshotService;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fairgo_kernel=info")),
        )
        .init();

    let cfg = load_config().await;

    let feed = FeedClient::new(&cfg.feed).context("failed to build upstream HTTP client")?;
    info!(
        "[kernel] upstream {} (freshness {}s, timeout {}s)",
        cfg.feed.url, cfg.feed.freshness_secs, cfg.feed.timeout_secs
    );

    let snapshots = Arc::new(SnapshotService::new(feed, HealthTracker::new()));
    let app = http::build_router(AppState { snapshots });

    let addr: SocketAddr = cfg
        .listen
        .parse()
        .with_context(|| format!("invalid listen address: {}", cfg.listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("[kernel] listening on http://{addr}");

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
