//! Header Shield (v1)
//!
//! Serves a fixed HTML page, static assets and a small API, with a security
//! header policy applied to every response.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────┐
//!                  │                   HEADER SHIELD                   │
//!                  │                                                   │
//!   Client Request │  ┌─────────┐   ┌──────────────┐   ┌────────────┐  │
//!   ───────────────┼─▶│  trace  │──▶│   security   │──▶│   router   │  │
//!                  │  │  layer  │   │   headers    │   │ / _api fs  │  │
//!                  │  └─────────┘   └──────┬───────┘   └─────┬──────┘  │
//!                  │                       │ resolve         │         │
//!   Client Response│                       ▼                 ▼         │
//!   ◀──────────────┼──────────────── apply to response ◀── handler     │
//!                  │                                                   │
//!                  │  ┌─────────────────────────────────────────────┐  │
//!                  │  │  config (TOML + PORT) · logging · lifecycle │  │
//!                  │  └─────────────────────────────────────────────┘  │
//!                  └───────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use header_shield::config::load_config;
use header_shield::lifecycle::startup;
use header_shield::observability::logging;

#[derive(Parser)]
#[command(name = "header-shield")]
#[command(about = "Web server with a fixed security header policy", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; overrides the config file and the PORT variable.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    logging::init(&config.observability);

    tracing::info!("header-shield v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    startup::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
