//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use header_shield::config::ServerConfig;
use header_shield::http::HttpServer;
use header_shield::lifecycle::Shutdown;

/// Defaults, with static assets from the repository's `public/` directory.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.server.static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public");
    config
}

/// Start the real server on an ephemeral port.
///
/// Keep the returned `Shutdown` alive for the duration of the test.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
