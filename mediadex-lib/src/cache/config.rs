//! Cache configuration

use std::time::Duration;

/// Configuration for cache TTLs and background sweeping.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use mediadex_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_request_ttl(Duration::from_secs(60))
///     .with_response_ttl(Duration::from_secs(7200));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for deduplicated in-memory request entries.
    ///
    /// Default: 5 minutes
    pub request_ttl: Duration,

    /// TTL for durable response entries.
    ///
    /// Default: 1 hour
    pub response_ttl: Duration,

    /// Interval between background sweeps of expired request entries.
    ///
    /// Default: 10 minutes
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            request_ttl: Duration::from_secs(300),     // 5 minutes
            response_ttl: Duration::from_secs(3600),   // 1 hour
            sweep_interval: Duration::from_secs(600),  // 10 minutes
        }
    }
}

impl CacheConfig {
    /// Creates a cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request-cache TTL.
    pub fn with_request_ttl(mut self, ttl: Duration) -> Self {
        self.request_ttl = ttl;
        self
    }

    /// Sets the durable response-cache TTL.
    pub fn with_response_ttl(mut self, ttl: Duration) -> Self {
        self.response_ttl = ttl;
        self
    }

    /// Sets the background sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Creates a config with no caching (zero TTLs).
    ///
    /// Requests are still coalesced while in flight; resolved values simply
    /// expire immediately.
    pub fn no_cache() -> Self {
        Self {
            request_ttl: Duration::ZERO,
            response_ttl: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.request_ttl, Duration::from_secs(300));
        assert_eq!(config.response_ttl, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_no_cache_zeroes_ttls() {
        let config = CacheConfig::no_cache();
        assert_eq!(config.request_ttl, Duration::ZERO);
        assert_eq!(config.response_ttl, Duration::ZERO);
    }
}
