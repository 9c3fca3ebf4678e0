//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check the header policy inputs are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.port must not be 0")]
    ZeroPort,

    #[error("server.static_dir must not be empty")]
    EmptyStaticDir,

    #[error("server.api_prefix `{0}` must start with '/' and must not be '/'")]
    InvalidApiPrefix(String),

    #[error("server.request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("security.hsts.max_age_secs must be greater than 0 when HSTS is enabled")]
    ZeroHstsMaxAge,

    #[error("security.csp directive #{0} has an empty name")]
    EmptyCspName(usize),

    #[error("security.csp directive `{0}` has no sources")]
    EmptyCspSources(String),

    #[error("security.csp directive `{0}` contains characters not allowed in a header value")]
    InvalidCspValue(String),

    #[error("security.disable entry `{0}` is not a valid header name")]
    InvalidDisabledHeader(String),

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.server.static_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyStaticDir);
    }

    let prefix = &config.server.api_prefix;
    if !prefix.starts_with('/') || prefix == "/" {
        errors.push(ValidationError::InvalidApiPrefix(prefix.clone()));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let security = &config.security;
    if security.hsts.enabled && security.hsts.max_age_secs == 0 {
        errors.push(ValidationError::ZeroHstsMaxAge);
    }

    if security.csp.enabled {
        for (i, directive) in security.csp.directives.iter().enumerate() {
            if directive.name.trim().is_empty() {
                errors.push(ValidationError::EmptyCspName(i));
                continue;
            }
            if directive.sources.is_empty() {
                errors.push(ValidationError::EmptyCspSources(directive.name.clone()));
            }
            let rendered = format!("{} {}", directive.name, directive.sources.join(" "));
            if rendered.contains(';') || HeaderValue::from_str(&rendered).is_err() {
                errors.push(ValidationError::InvalidCspValue(directive.name.clone()));
            }
        }
    }

    for name in &security.disable {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidDisabledHeader(name.clone()));
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
