// src/lib.rs
// Public library surface shared by both binaries and the integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod metrics;
pub mod model;
pub mod paging;
pub mod remote;
pub mod resolve;
pub mod search;
pub mod service;
pub mod shape;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use shuttle_axum::axum::Router;
use tracing::info;

pub use crate::api::router;
pub use crate::config::Config;
pub use crate::error::ApiError;
pub use crate::mcp::McpHandler;
pub use crate::remote::{ArticleApi, DevToClient};
pub use crate::service::ArticleService;

/// Build the article service against the live Dev.to API.
pub fn service_from_config(config: &Config) -> anyhow::Result<ArticleService> {
    let client = DevToClient::new(&config.remote).context("building Dev.to HTTP client")?;
    info!(
        target: "devto",
        base_url = %config.remote.base_url,
        authenticated = client.authenticated(),
        "Dev.to client ready"
    );
    Ok(ArticleService::new(Arc::new(client), config.paging))
}

/// Full REST + MCP router for `config`, without `/metrics`.
pub fn app(config: &Config) -> anyhow::Result<Router> {
    Ok(router(service_from_config(config)?))
}
