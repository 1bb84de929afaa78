//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the lyrics proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream lyrics API settings.
    pub upstream: UpstreamConfig,

    /// Shared-secret gate settings.
    pub auth: AuthConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream lyrics API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API.
    pub base_url: String,

    /// Bearer token for the upstream API.
    ///
    /// Overridable via the `LYRICS_UPSTREAM_TOKEN` environment
    /// variable. Requests fail with a configuration error when absent.
    pub bearer_token: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.genius.com".to_string(),
            bearer_token: None,
        }
    }
}

/// Shared-secret gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret clients must present in the `X-Proxy-Secret` header.
    ///
    /// Overridable via the `PROXY_SHARED_SECRET` environment variable.
    /// When unset, every request is rejected with 401.
    pub shared_secret: Option<String>,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per second per client key.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 100,
            burst_size: 50,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the response cache.
    pub enabled: bool,

    /// Maximum number of cached responses.
    pub max_entries: usize,

    /// Edge cache lifetime in seconds (Cache-Control s-maxage, and the
    /// lifetime of entries in the in-process cache).
    pub edge_ttl_secs: u64,

    /// Browser cache lifetime in seconds (Cache-Control max-age).
    pub browser_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
            edge_ttl_secs: 86_400,
            browser_ttl_secs: 3_600,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Upstream fetch timeout in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.base_url, "https://api.genius.com");
        assert!(config.upstream.bearer_token.is_none());
        assert!(config.auth.shared_secret.is_none());
        assert!(!config.rate_limit.enabled);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.edge_ttl_secs, 86_400);
        assert_eq!(config.cache.browser_ttl_secs, 3_600);
    }

    #[test]
    fn test_minimal_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [auth]
            shared_secret = "hunter2"

            [upstream]
            bearer_token = "tok"
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.shared_secret.as_deref(), Some("hunter2"));
        assert_eq!(config.upstream.bearer_token.as_deref(), Some("tok"));
        // Unspecified sections fall back to defaults.
        assert_eq!(config.timeouts.upstream_secs, 10);
    }
}
