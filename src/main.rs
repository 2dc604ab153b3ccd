//! CORS relay server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                      CORS RELAY                       │
//!                      │                                                       │
//!  GET /api/proxy?url= │  ┌────────┐   ┌─────────────┐   ┌──────────────────┐  │
//!  ────────────────────┼─▶│  http  │──▶│ credentials │──▶│ routing (plan)   │  │
//!                      │  │ server │   │  injection  │   └────────┬─────────┘  │
//!                      │  └────────┘   └─────────────┘            │            │
//!                      │       ▲                                  ▼            │
//!                      │       │          ┌──────────────────────────────────┐ │
//!  ◀───────────────────┼───────┘          │ relay engine (one at a time)     │ │
//!   body + CORS headers│                  │  1. direct     (whitelisted)     │─┼──▶ upstream
//!   or 400 / 502       │                  │  2. pool[0..n] (CORS proxies)    │─┼──▶ proxies
//!                      │                  │  3. last resort                  │─┼──▶ upstream
//!                      │                  └──────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{load_config, validation::validate_config, ConfigError, RelayConfig};
use cors_relay::lifecycle::{wait_for_signal, Shutdown};
use cors_relay::observability::{logging, metrics};
use cors_relay::HttpServer;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Server-side relay with direct, proxy-pool and last-resort fallbacks", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<RelayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        pool_size = config.relay.proxy_pool.len(),
        direct_rules = config.relay.direct_rules.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move { wait_for_signal(&shutdown).await });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
