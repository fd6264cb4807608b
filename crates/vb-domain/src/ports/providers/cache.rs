//! Cache backend port
//!
//! Contract for cache backends underneath the tiered cache. Backends store
//! opaque JSON strings with per-entry TTL; eviction order is TTL-expiry
//! first, then least-recently-used.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-entry write configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheEntryConfig {
    /// Time to live; `None` uses the backend's configured default
    pub ttl: Option<Duration>,
}

impl CacheEntryConfig {
    /// Entry with an explicit TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

/// Cache performance counters
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Live entries
    pub entries: u64,
}

impl CacheStats {
    /// Hit rate in [0, 1]; 0.0 when the cache has seen no traffic
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Cache backend provider
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Get a cached JSON string, `None` on miss or expiry
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a JSON string under a key
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Delete a key; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Drop every entry
    async fn clear(&self) -> Result<()>;

    /// Current performance counters
    async fn stats(&self) -> Result<CacheStats>;

    /// Identifier of this provider (e.g. "moka", "null")
    fn provider_name(&self) -> &str;
}
