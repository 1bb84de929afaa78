//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidMetricsAddress(String),
    InvalidUpstreamUrl(String),
    ZeroRateLimit,
    ZeroBurstSize,
    ZeroCacheTtl,
    ZeroTimeout(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address '{}' is not a socket address", addr)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address '{}' is not a socket address", addr)
            }
            ValidationError::InvalidUpstreamUrl(url) => {
                write!(f, "upstream.base_url '{}' is not a valid URL", url)
            }
            ValidationError::ZeroRateLimit => {
                write!(f, "rate_limit.requests_per_second must be > 0 when enabled")
            }
            ValidationError::ZeroBurstSize => {
                write!(f, "rate_limit.burst_size must be > 0 when enabled")
            }
            ValidationError::ZeroCacheTtl => {
                write!(f, "cache.edge_ttl_secs must be > 0 when enabled")
            }
            ValidationError::ZeroTimeout(field) => {
                write!(f, "timeouts.{} must be > 0", field)
            }
        }
    }
}

/// Validate the configuration, collecting every violation.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if url::Url::parse(&config.upstream.base_url).is_err() {
        errors.push(ValidationError::InvalidUpstreamUrl(
            config.upstream.base_url.clone(),
        ));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::ZeroRateLimit);
        }
        if config.rate_limit.burst_size == 0 {
            errors.push(ValidationError::ZeroBurstSize);
        }
    }

    if config.cache.enabled && config.cache.edge_ttl_secs == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
