//! MCP over stdio: one JSON-RPC message per line in, one reply per line out.
//! Logs go to stderr so stdout carries protocol traffic only.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use devto_mcp::{config::Config, telemetry, McpHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::load().context("loading configuration")?;
    telemetry::init(&config.log, true);

    let service = devto_mcp::service_from_config(&config)?;
    let handler = McpHandler::new(Arc::new(service));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    tracing::info!(target: "devto", "stdio transport ready");

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(reply) = handler.handle_json(&line).await {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!(target: "devto", "stdin closed; exiting");
    Ok(())
}
