//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Redis listens on the standard port; it is not configurable.
pub const REDIS_PORT: u16 = 6379;

/// Default TTL in seconds for cache entries set without an explicit TTL.
pub const DEFAULT_CACHE_TTL: u64 = 3600;

// == Store Backend ==
/// Which key/value store the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// External Redis server
    Redis,
    /// In-process store, for local runs without Redis
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis hostname
    pub redis_host: String,
    /// Redis password, empty for no AUTH
    pub redis_password: String,
    /// HTTP server port
    pub server_port: u16,
    /// Store implementation to use
    pub backend: StoreBackend,
    /// Memory-store sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Redis hostname (default: localhost)
    /// - `REDIS_PASSWORD` - Redis password (default: empty)
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `STORE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CLEANUP_INTERVAL` - Memory-store sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_host: env::var("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_password: env::var("REDIS_PASSWORD").unwrap_or(defaults.redis_password),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            backend: env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or(defaults.backend),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Connection URL for the Redis client.
    pub fn redis_url(&self) -> String {
        if self.redis_password.is_empty() {
            format!("redis://{}:{}/", self.redis_host, REDIS_PORT)
        } else {
            format!(
                "redis://:{}@{}:{}/",
                self.redis_password, self.redis_host, REDIS_PORT
            )
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_host: "localhost".to_string(),
            redis_password: String::new(),
            server_port: 5000,
            backend: StoreBackend::Redis,
            cleanup_interval: 1,
        }
    }
}
