//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, security headers)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::api::api_router;
use crate::http::pages::{index_handler, IndexPage};
use crate::security::{security_headers_middleware, PolicyBuilder, PolicyError, PolicySet};

/// Error building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("security policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("index page {}: {source}", .path.display())]
    IndexPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    policy: Arc<PolicySet>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Builds the security policy and reads the index page; both are fixed
    /// for the lifetime of the server.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let policy = Arc::new(PolicyBuilder::from_config(&config.security)?);

        for name in policy.shadowed() {
            tracing::warn!(
                header = %name,
                "Header is enabled and later disabled by the security policy; it will not be sent"
            );
        }

        let index_path = config.server.index_path.as_deref();
        let index = IndexPage::load(index_path).map_err(|source| ServerError::IndexPage {
            path: index_path.map(PathBuf::from).unwrap_or_default(),
            source,
        })?;

        tracing::info!(
            directives = policy.len(),
            static_dir = %config.server.static_dir.display(),
            api_prefix = %config.server.api_prefix,
            "Security policy built"
        );

        let router = Self::build_router(&config, policy.clone(), index);
        Ok(Self { router, policy })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The security layer sits outside the timeout so timeout responses get
    /// the headers too.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, policy: Arc<PolicySet>, index: IndexPage) -> Router {
        let timeout = Duration::from_secs(config.server.request_timeout_secs);

        Router::new()
            .route("/", get(index_handler))
            .with_state(index)
            .nest(&config.server.api_prefix, api_router(policy.clone()))
            .fallback_service(ServeDir::new(&config.server.static_dir))
            .layer(TimeoutLayer::new(timeout))
            .layer(middleware::from_fn_with_state(policy, security_headers_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn policy(&self) -> &PolicySet {
        &self.policy
    }
}
