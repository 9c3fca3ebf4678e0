//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server (policy, index page) from validated configuration
//! - Bind the listener
//! - Install signal handling and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds after the server is built (traffic only when ready)

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};

/// Run the server described by `config` until a stop signal arrives.
pub async fn start(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Your app is listening"
    );

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
