//! Page Sentry Relay Server
//!
//! Renderer-side HTTP endpoint: answers prediction messages with display
//! copy and classifies submitted page snapshots.
//!
//! Usage:
//!   cargo run --bin page_sentry_relay
//!
//! Environment:
//!   PORT / PAGE_SENTRY_PORT     - Server port (default: 8080)
//!   PAGE_SENTRY_HOST            - Server host (default: 0.0.0.0)
//!   PAGE_SENTRY_RATE_LIMIT      - Requests per client per minute (default: 120)
//!   PAGE_SENTRY_MAX_CONCURRENCY - In-flight request cap (default: 64)
//!   RUST_LOG                    - Log filter (default: info)

use page_sentry::api::{create_router, handlers::AppState, start_cleanup_task};
use page_sentry::utils::constants::{APP_NAME, APP_VERSION};
use page_sentry::{EngineConfig, RelayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = RelayConfig::from_env()?;
    let engine = EngineConfig::default();
    info!(
        "🧮 Weight table {} (sum {:.4}), {} safe domain(s)",
        engine.weights.version,
        engine.weights.total(),
        engine.safe_domains.len()
    );

    let state = Arc::new(AppState::new(engine));

    start_cleanup_task();
    info!("🧹 Background cleanup task started");

    let app = create_router(state, &config);

    let addr: SocketAddr = config.bind_addr().parse()?;

    info!("🚀 {} relay v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  POST /v1/prediction - Prediction exchange");
    info!("  POST /v1/classify   - Classify a page snapshot");
    info!("  GET  /v1/health     - Health check");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 {} relay shutdown complete", APP_NAME);
    Ok(())
}
