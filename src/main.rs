//! catalog-proxy
//!
//! Transparent forwarding proxy between the catalog viewer and its upstream APIs.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                  CATALOG PROXY                   │
//!                       │                                                  │
//!   Browser Request     │  ┌─────────┐    ┌──────────┐    ┌────────────┐   │
//!   ────────────────────┼─▶│  http   │───▶│ routing  │───▶│  forward   │───┼──▶ Upstream API
//!                       │  │ server  │    │ (prefix) │    │  engine    │   │    (redirects
//!                       │  └─────────┘    └──────────┘    └─────┬──────┘   │     followed)
//!                       │                                       │          │
//!   Client Response     │  ┌──────────────────────┐             │          │
//!   ◀───────────────────┼──│ response (hop-by-hop │◀────────────┘          │
//!                       │  │ stripped, verbatim)  │                        │
//!                       │  └──────────────────────┘                        │
//!                       │                                                  │
//!                       │  config · security · observability · lifecycle   │
//!                       └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use catalog_proxy::config::loader::{load_config, ConfigError};
use catalog_proxy::config::validation::validate_config;
use catalog_proxy::observability::{logging, metrics};
use catalog_proxy::{Credential, HttpServer, ProxyConfig, Shutdown};

#[derive(Parser)]
#[command(name = "catalog-proxy")]
#[command(about = "Credential-injecting forwarding proxy for the catalog viewer", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is normal in production.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability);

    tracing::info!("catalog-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoints = config.endpoints.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let credential = Credential::from_env(&config.credential.env_var);
    if credential.is_none() {
        tracing::warn!(env_var = %config.credential.env_var, "Upstream credential not set");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config, credential)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
