//! Configuration for the `AuthZ` resolver.

use std::time::Duration;

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthZResolverConfig {
    /// Upper bound on a single grant store call. An elapsed timeout is a
    /// resolver failure and therefore a denial.
    pub grant_store_timeout_ms: u64,

    /// Single retry for transient grant store failures.
    pub retry: RetryConfig,

    /// Per-subject grant cache.
    pub cache: CacheConfig,
}

impl Default for AuthZResolverConfig {
    fn default() -> Self {
        Self {
            grant_store_timeout_ms: 2000,
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl AuthZResolverConfig {
    #[must_use]
    pub fn grant_store_timeout(&self) -> Duration {
        Duration::from_millis(self.grant_store_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Pause before the retry.
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backoff_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum age of a cached grant set, measured from when the store was queried.
    pub ttl_ms: u64,
    /// Entries beyond this bound evict expired entries first, then the oldest.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: 30_000,
            max_entries: 10_000,
        }
    }
}
