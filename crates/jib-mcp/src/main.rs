//! Jib MCP server binary.
//!
//! This binary runs the MCP server using stdio transport.

use std::sync::Arc;

use jib::{Config, JiraClient};
use jib_mcp::JibMcpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout carries the MCP transport; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(base_url = %config.base_url, "Starting jib-mcp server");

    let client = Arc::new(JiraClient::new(config)?);
    let server = JibMcpServer::new(client);
    server.run().await?;

    Ok(())
}
