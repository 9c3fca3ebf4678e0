//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `listener.port`.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value `{0}`: expected a TCP port number")]
    InvalidPort(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
///
/// Without a file the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => ServerConfig::default(),
    };

    let port = std::env::var(PORT_ENV).ok();
    apply_port_override(&mut config, port.as_deref())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Override the listener port with the value of `PORT`, if set.
pub fn apply_port_override(config: &mut ServerConfig, port: Option<&str>) -> Result<(), ConfigError> {
    let Some(raw) = port else {
        return Ok(());
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    config.listener.port = trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
    Ok(())
}
