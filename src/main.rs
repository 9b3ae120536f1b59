//! devto-mcp HTTP entrypoint.
//! Boots the Axum server on Shuttle: REST routes, `POST /mcp` and `/metrics`.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;

use devto_mcp::{config::Config, metrics::Metrics, telemetry};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    let config = Config::load().context("loading configuration")?;

    // Shuttle may already own the global subscriber; then ours is skipped.
    if !telemetry::init(&config.log, false) {
        tracing::debug!(target: "devto", "tracing subscriber already installed");
    }

    let metrics = Metrics::init()?;
    let router = devto_mcp::app(&config)?.merge(metrics.router());

    tracing::info!(target: "devto", "devto-mcp router built");
    Ok(router.into())
}
