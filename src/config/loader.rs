//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.bearer_token`.
pub const UPSTREAM_TOKEN_ENV: &str = "LYRICS_UPSTREAM_TOKEN";

/// Environment variable overriding `auth.shared_secret`.
pub const SHARED_SECRET_ENV: &str = "PROXY_SHARED_SECRET";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Secrets from the environment take precedence over file values.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ProxyConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a default configuration with env secret overrides applied.
///
/// Used when no config file is present.
pub fn default_config() -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut ProxyConfig) {
    if let Ok(token) = std::env::var(UPSTREAM_TOKEN_ENV) {
        if !token.is_empty() {
            config.upstream.bearer_token = Some(token);
        }
    }
    if let Ok(secret) = std::env::var(SHARED_SECRET_ENV) {
        if !secret.is_empty() {
            config.auth.shared_secret = Some(secret);
        }
    }
}
