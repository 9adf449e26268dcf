//! Configuration Module
//!
//! Handles loading and managing core service configuration from environment variables.

use std::env;

use crate::cache::{DEFAULT_MAX_BYTES, DEFAULT_TTL};
use crate::timer::DEFAULT_TICK;

/// Core service configuration parameters.
///
/// All values can be configured via environment variables, defaulting to
/// the service constants ([`DEFAULT_MAX_BYTES`], [`DEFAULT_TTL`],
/// [`DEFAULT_TICK`]).
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum total size of live cache entries in bytes
    pub cache_max_bytes: usize,
    /// Default TTL in milliseconds for cache entries without an explicit TTL
    pub cache_default_ttl_ms: u64,
    /// Timer poll tick in milliseconds
    pub timer_tick_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_BYTES` - Cache byte budget (default: 2097152, 2 MiB)
    /// - `CACHE_DEFAULT_TTL_MS` - Default entry TTL in milliseconds (default: 3600000, one hour)
    /// - `TIMER_TICK_MS` - Timer poll granularity in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            cache_max_bytes: env::var("CACHE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BYTES),
            cache_default_ttl_ms: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL.as_millis() as u64),
            timer_tick_ms: env::var("TIMER_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TICK.as_millis() as u64),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_bytes: DEFAULT_MAX_BYTES,
            cache_default_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            timer_tick_ms: DEFAULT_TICK.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_bytes, 2 * 1024 * 1024);
        assert_eq!(config.cache_default_ttl_ms, 3_600_000);
        assert_eq!(config.timer_tick_ms, 1000);
    }

    #[test]
    fn test_config_defaults_track_service_constants() {
        let config = Config::default();
        assert_eq!(config.cache_max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(config.cache_default_ttl_ms, DEFAULT_TTL.as_millis() as u64);
        assert_eq!(config.timer_tick_ms, DEFAULT_TICK.as_millis() as u64);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_MAX_BYTES");
        env::remove_var("CACHE_DEFAULT_TTL_MS");
        env::remove_var("TIMER_TICK_MS");

        let config = Config::from_env();
        assert_eq!(config.cache_max_bytes, 2 * 1024 * 1024);
        assert_eq!(config.cache_default_ttl_ms, 3_600_000);
        assert_eq!(config.timer_tick_ms, 1000);
    }
}
