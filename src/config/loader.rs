//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables recognized as overrides, applied after file load.
pub const ENV_LISTEN_ADDR: &str = "PROXY_LISTEN_ADDR";
pub const ENV_UPSTREAM_HOST: &str = "PROXY_UPSTREAM_HOST";
pub const ENV_UPSTREAM_PORT: &str = "PROXY_UPSTREAM_PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then
/// semantic validation. With no file and no overrides the documented defaults
/// apply.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PROXY_*` environment variable overrides to a loaded config.
pub fn apply_env_overrides(config: &mut ProxyConfig) {
    apply_overrides(config, |key| env::var(key).ok());
}

// Override lookup is injected so tests can exercise this without mutating
// process-wide environment state.
fn apply_overrides<F>(config: &mut ProxyConfig, get: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = get(ENV_LISTEN_ADDR) {
        config.listener.bind_address = addr;
    }
    if let Some(host) = get(ENV_UPSTREAM_HOST) {
        config.upstream.host = host;
    }
    if let Some(port) = get(ENV_UPSTREAM_PORT) {
        match port.parse() {
            Ok(port) => config.upstream.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring unparseable {}", ENV_UPSTREAM_PORT),
        }
    }
}
