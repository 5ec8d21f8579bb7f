// src/config.rs
//
// Runtime settings, read from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://query.ampre.ca/odata";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str = "/images/placeholder-property.jpg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub provider: ProviderConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub token: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Listing keys per media request, kept within 3..=5.
    pub batch_size: usize,
    /// Media requests in flight at once across all workers, kept within 1..=16.
    pub max_concurrency: usize,
    pub placeholder_url: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            max_concurrency: 4,
            placeholder_url: DEFAULT_PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("AMPRE_API_TOKEN").ok_or(ConfigError::Missing("AMPRE_API_TOKEN"))?;
        let base_url = get("AMPRE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind.clone(),
        })?;

        let max_workers = parse_or(&get, "MAX_WORKERS", 8usize)?.max(1);
        let connect_secs = parse_or(&get, "PROVIDER_CONNECT_TIMEOUT_SECS", 5u64)?;
        let timeout_secs = parse_or(&get, "PROVIDER_TIMEOUT_SECS", 15u64)?;
        let batch_size = parse_or(&get, "IMAGE_BATCH_SIZE", 4usize)?.clamp(3, 5);
        let max_concurrency = parse_or(&get, "IMAGE_MAX_CONCURRENCY", 4usize)?.clamp(1, 16);
        let placeholder_url = get("PLACEHOLDER_IMAGE_URL")
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE_URL.to_string());

        Ok(Config {
            bind_addr,
            max_workers,
            provider: ProviderConfig {
                base_url,
                token,
                connect_timeout: Duration::from_secs(connect_secs.max(1)),
                timeout: Duration::from_secs(timeout_secs.max(1)),
            },
            images: ImageConfig {
                batch_size,
                max_concurrency,
                placeholder_url,
            },
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
