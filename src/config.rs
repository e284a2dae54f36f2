//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

use crate::cache::{clamp_limit, DEFAULT_MEMORY_LIMIT};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory limit of the value cache in bytes (0 disables caching)
    pub memory_limit: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Interval in seconds between cache usage reports
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MEMORY_LIMIT` - Cache memory limit in bytes, negative clamps to 0 (default: 500 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STATS_INTERVAL` - Usage report frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            memory_limit: env::var("CACHE_MEMORY_LIMIT")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .map(clamp_limit)
                .unwrap_or(DEFAULT_MEMORY_LIMIT),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            stats_interval: env::var("STATS_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            server_port: 3000,
            stats_interval: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.memory_limit, 500 * 1024 * 1024);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.stats_interval, 30);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment so parallel tests cannot race
        env::remove_var("CACHE_MEMORY_LIMIT");
        env::remove_var("SERVER_PORT");
        env::remove_var("STATS_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.memory_limit, DEFAULT_MEMORY_LIMIT);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.stats_interval, 30);

        env::set_var("CACHE_MEMORY_LIMIT", "-1");
        assert_eq!(Config::from_env().memory_limit, 0);

        env::set_var("CACHE_MEMORY_LIMIT", "4096");
        assert_eq!(Config::from_env().memory_limit, 4096);

        env::set_var("CACHE_MEMORY_LIMIT", "lots");
        assert_eq!(Config::from_env().memory_limit, DEFAULT_MEMORY_LIMIT);

        env::remove_var("CACHE_MEMORY_LIMIT");
    }
}
