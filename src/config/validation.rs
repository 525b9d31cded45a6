//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic parsing. Validation is a pure
//! function and reports every violation found, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upstream.host must not be empty")]
    EmptyUpstreamHost,

    #[error("upstream.port must not be 0")]
    ZeroUpstreamPort,

    #[error("upstream {0:?} does not form a valid authority")]
    InvalidUpstreamAuthority(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.host.is_empty() {
        errors.push(ValidationError::EmptyUpstreamHost);
    } else if config.upstream.authority().is_err() {
        errors.push(ValidationError::InvalidUpstreamAuthority(format!(
            "{}:{}",
            config.upstream.host, config.upstream.port
        )));
    }

    if config.upstream.port == 0 {
        errors.push(ValidationError::ZeroUpstreamPort);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
