//! Gateway configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Runtime configuration for the gateway.
///
/// Every field has a serde default so partial config files deserialize, and
/// [`GatewayConfig::from_env`] layers environment overrides on top. The auth
/// secret has no default on purpose: the service must not come up without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Secret used to sign and verify bearer tokens.
    pub auth_secret: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Lifetime of issued bearer tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Directory where resolved artifacts are written.
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// Deadline for a single peer query. Expiry reads as a failed query.
    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,

    /// URL serving the peer directory as JSON, if any.
    #[serde(default)]
    pub directory_url: Option<String>,

    /// Interval between peer directory refreshes, in seconds.
    #[serde(default = "default_directory_refresh_secs")]
    pub directory_refresh_secs: u64,

    /// Upper bound on concurrently handled requests.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// JSON file holding the startup denylists, if any.
    #[serde(default)]
    pub denylist_path: Option<PathBuf>,

    /// JSON file holding seed accounts, if any.
    #[serde(default)]
    pub accounts_path: Option<PathBuf>,
}

impl GatewayConfig {
    /// Build a configuration from environment variables.
    ///
    /// `SAUTI_AUTH_SECRET` is required; everything else falls back to a
    /// default. Unparseable numeric overrides are logged and ignored.
    pub fn from_env() -> Result<Self> {
        let auth_secret = match std::env::var("SAUTI_AUTH_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                return Err(Error::Internal(
                    "Auth secret not found in environment variable SAUTI_AUTH_SECRET".to_string(),
                ))
            }
        };

        Ok(Self {
            auth_secret,
            host: env_or("SAUTI_HOST", default_host()),
            port: env_parsed("SAUTI_PORT", default_port()),
            token_ttl_secs: env_parsed("SAUTI_TOKEN_TTL_SECS", default_token_ttl_secs()),
            artifacts_dir: std::env::var("SAUTI_ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_artifacts_dir()),
            dispatch_timeout_secs: env_parsed(
                "SAUTI_DISPATCH_TIMEOUT_SECS",
                default_dispatch_timeout_secs(),
            ),
            directory_url: std::env::var("SAUTI_DIRECTORY_URL").ok(),
            directory_refresh_secs: env_parsed(
                "SAUTI_DIRECTORY_REFRESH_SECS",
                default_directory_refresh_secs(),
            ),
            max_concurrent_requests: env_parsed(
                "SAUTI_MAX_CONCURRENT_REQUESTS",
                default_max_concurrent_requests(),
            ),
            denylist_path: std::env::var("SAUTI_DENYLIST_PATH").ok().map(PathBuf::from),
            accounts_path: std::env::var("SAUTI_ACCOUNTS_PATH").ok().map(PathBuf::from),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {}='{}', falling back to default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_token_ttl_secs() -> u64 {
    86_400
}

fn default_artifacts_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sauti")
        .join("artifacts")
}

fn default_dispatch_timeout_secs() -> u64 {
    120
}

fn default_directory_refresh_secs() -> u64 {
    60
}

fn default_max_concurrent_requests() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_file_fills_defaults() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"auth_secret": "s3cret"}"#).expect("deserialize");
        assert_eq!(config.port, 8080);
        assert_eq!(config.dispatch_timeout_secs, 120);
        assert!(config.directory_url.is_none());
    }

    #[test]
    fn secret_has_no_default() {
        let parsed: std::result::Result<GatewayConfig, _> = serde_json::from_str("{}");
        assert!(parsed.is_err());
    }
}
