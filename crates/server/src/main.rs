//! cep-cache server entry point.
//!
//! Boots either the HTTP boundary or the MCP server on stdio transport,
//! depending on configuration. Logging goes to stderr so it never
//! interferes with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use cep_client::{ViaCepClient, ViaCepConfig};
use cep_core::{AppConfig, CacheDb, CepLookup, Transport};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod http;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening address cache at {}", config.db_path.display()))?;
    let provider = ViaCepClient::new(ViaCepConfig::from(&config)).context("building ViaCEP client")?;
    let lookup = CepLookup::new(Arc::new(db), Arc::new(provider));

    match config.transport {
        Transport::Http => {
            tracing::info!(addr = %config.http_addr, "Starting cep-cache server on HTTP transport");
            http::serve(config.http_addr, lookup).await?;
        }
        Transport::Stdio => {
            tracing::info!("Starting cep-cache server on stdio transport");
            let server = serve_server(handler::CepMcpServer::new(lookup), stdio()).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}
