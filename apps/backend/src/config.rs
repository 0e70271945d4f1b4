//! Configuration module for the movie search backend.
//!
//! Loads configuration from `config.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use omdb_search::SearchSettings;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// OMDB API configuration
#[derive(Clone, Deserialize)]
pub struct OmdbConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

// Custom Debug implementation to avoid exposing api_key
impl std::fmt::Debug for OmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl OmdbConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_base_url() -> String {
    omdb_search::client::OMDB_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Search result cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    60 * 60
}

fn default_cache_capacity() -> u64 {
    10_000
}

/// Remote fan-out configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

fn default_max_concurrent_requests() -> usize {
    10
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `MOVIE_SEARCH_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `MOVIE_SEARCH_SERVER__PORT=9000` sets `server.port`
    /// - `MOVIE_SEARCH_OMDB__API_KEY=...` sets `omdb.api_key`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("omdb.base_url", omdb_search::client::OMDB_BASE_URL)?
            .set_default("omdb.request_timeout_secs", 30)?
            .set_default("cache.ttl_secs", 3600)?
            .set_default("cache.max_capacity", 10_000)?
            .set_default("search.max_concurrent_requests", 10)?
            .add_source(File::with_name(config_path).required(false))
            // MOVIE_SEARCH_SERVER__PORT=9000 -> server.port = 9000
            .add_source(
                Environment::with_prefix("MOVIE_SEARCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), AppError> {
        if self.omdb.api_key.is_none() {
            tracing::warn!("OMDB API key not configured - movie search will be unavailable");
        }

        if self.omdb.request_timeout_secs == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "omdb.request_timeout_secs must be greater than zero".to_string(),
            )));
        }

        if self.search.max_concurrent_requests == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "search.max_concurrent_requests must be greater than zero".to_string(),
            )));
        }

        Ok(())
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::{IpAddr, Ipv4Addr, SocketAddr};
        let ip: IpAddr = self.server.host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid host '{}', using 0.0.0.0", self.server.host);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.server.port)
    }

    /// Aggregator settings derived from the cache and search sections.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            max_concurrent_requests: self.search.max_concurrent_requests,
        }
    }
}
