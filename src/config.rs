//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::resilience::RetryPolicy;

/// Shortest period accepted for background tasks and health checks.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Total attempts per retried operation
    pub retry_max_attempts: u32,
    /// Backoff before the second attempt, in milliseconds
    pub retry_base_delay_ms: u64,
    /// Periodic health probe interval in seconds
    pub health_check_interval: u64,
    /// Upper bound on a single health probe, in milliseconds
    pub probe_timeout_ms: u64,
    /// host:port of the backing store
    pub database_addr: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1800)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per retried operation (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - First backoff in milliseconds (default: 1000)
    /// - `HEALTH_CHECK_INTERVAL` - Health probe frequency in seconds (default: 30)
    /// - `HEALTH_PROBE_TIMEOUT_MS` - Probe bound in milliseconds (default: 3000)
    /// - `DATABASE_ADDR` - Backing store address (default: 127.0.0.1:27017)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts),
            retry_base_delay_ms: env_or("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            health_check_interval: env_or("HEALTH_CHECK_INTERVAL", defaults.health_check_interval),
            probe_timeout_ms: env_or("HEALTH_PROBE_TIMEOUT_MS", defaults.probe_timeout_ms),
            database_addr: env::var("DATABASE_ADDR").unwrap_or(defaults.database_addr),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Sweep period; zero is raised to [`MIN_INTERVAL`].
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval).max(MIN_INTERVAL)
    }

    /// Probe period; zero is raised to [`MIN_INTERVAL`].
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval).max(MIN_INTERVAL)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

/// Parses `name`, falling back to `default` when unset or unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 300,
            server_port: 3000,
            cleanup_interval: 1800,
            retry_max_attempts: 3,
            retry_base_delay_ms: 1000,
            health_check_interval: 30,
            probe_timeout_ms: 3000,
            database_addr: "127.0.0.1:27017".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1800);
        assert_eq!(config.database_addr, "127.0.0.1:27017");
    }

    #[test]
    fn test_derived_durations() {
        let config = Config::default();
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(1800));
        assert_eq!(config.health_check_interval(), Duration::from_secs(30));
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::new(3, Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_zero_intervals_are_raised() {
        let config = Config {
            cleanup_interval: 0,
            health_check_interval: 0,
            ..Config::default()
        };
        assert_eq!(config.cleanup_interval(), MIN_INTERVAL);
        assert_eq!(config.health_check_interval(), MIN_INTERVAL);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("STOREFRONT_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("STOREFRONT_CACHE_TEST_GARBAGE", 7u32), 7);

        env::set_var("STOREFRONT_CACHE_TEST_VALID", "42");
        assert_eq!(env_or("STOREFRONT_CACHE_TEST_VALID", 7u32), 42);

        assert_eq!(env_or("STOREFRONT_CACHE_TEST_UNSET", 9u64), 9);
    }
}
