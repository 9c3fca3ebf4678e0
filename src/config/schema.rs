//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files, and
//! every default reproduces the stock deployment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Content served by the application (static files, sub-app, index page).
    pub server: ContentConfig,

    /// Security header policy.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// What the router serves.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory of static assets, served as the router fallback.
    pub static_dir: PathBuf,

    /// Path prefix the sub-application is nested under.
    pub api_prefix: String,

    /// HTML document for `GET /`. The bundled page is used when unset.
    pub index_path: Option<PathBuf>,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
            api_prefix: "/_api".to_string(),
            index_path: None,
            request_timeout_secs: 30,
        }
    }
}

/// `X-Frame-Options` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameAction {
    Deny,
    SameOrigin,
}

impl FrameAction {
    pub fn as_header_value(self) -> &'static str {
        match self {
            FrameAction::Deny => "DENY",
            FrameAction::SameOrigin => "SAMEORIGIN",
        }
    }
}

/// Strict-Transport-Security settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HstsConfig {
    pub enabled: bool,

    /// `max-age` in seconds (default: 90 days).
    pub max_age_secs: u64,

    pub include_subdomains: bool,

    pub preload: bool,

    /// Send the header on plain HTTP requests too. When false, the header is
    /// only sent when the request arrived over HTTPS.
    pub force: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_secs: 90 * 24 * 60 * 60,
            include_subdomains: true,
            preload: false,
            force: true,
        }
    }
}

/// One Content-Security-Policy directive, e.g. `script-src 'self' cdn.example`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CspDirective {
    pub name: String,
    pub sources: Vec<String>,
}

impl CspDirective {
    pub fn new(name: impl Into<String>, sources: &[&str]) -> Self {
        Self {
            name: name.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Content-Security-Policy settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CspConfig {
    pub enabled: bool,

    /// Directives in emission order.
    pub directives: Vec<CspDirective>,
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directives: vec![
                CspDirective::new("default-src", &["'self'"]),
                CspDirective::new("script-src", &["'self'", "trusted-cdn.com"]),
            ],
        }
    }
}

/// Security header policy configuration.
///
/// Each flag toggles one protection. The protections are applied in a fixed
/// order, then the umbrella bundle (when enabled), then `disable`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Strip `X-Powered-By`.
    pub hide_powered_by: bool,

    /// `X-Frame-Options`. `None` leaves framing unrestricted.
    pub frameguard: Option<FrameAction>,

    /// `X-XSS-Protection: 1; mode=block`.
    pub xss_filter: bool,

    /// `X-Content-Type-Options: nosniff`.
    pub no_sniff: bool,

    /// `X-Download-Options: noopen`.
    pub ie_no_open: bool,

    pub hsts: HstsConfig,

    /// Allow browsers to prefetch DNS (`X-DNS-Prefetch-Control: on`/`off`).
    pub allow_dns_prefetch: bool,

    /// Send the cache-disabling header set.
    pub no_cache: bool,

    pub csp: CspConfig,

    /// Re-apply the standard protection bundle after the individual calls.
    pub umbrella: bool,

    /// Header names removed from every response, applied last.
    pub disable: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            hide_powered_by: true,
            frameguard: Some(FrameAction::Deny),
            xss_filter: true,
            no_sniff: true,
            ie_no_open: true,
            hsts: HstsConfig::default(),
            allow_dns_prefetch: false,
            no_cache: true,
            csp: CspConfig::default(),
            umbrella: true,
            disable: vec!["strict-transport-security".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
