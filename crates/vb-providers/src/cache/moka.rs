//! Moka in-memory cache provider
//!
//! Concurrent TTL+LRU cache backend built on Moka. Capacity bounds trigger
//! LRU eviction; expiry is per entry, defaulting to the instance's
//! configured TTL, so one backend instance serves one cache tier.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use vb_domain::error::Result;
use vb_domain::ports::providers::{CacheEntryConfig, CacheProvider, CacheStats};

use crate::constants::CACHE_DEFAULT_CAPACITY;

#[derive(Clone)]
struct CachedValue {
    json: String,
    ttl: Option<Duration>,
}

struct PerEntryTtl {
    default_ttl: Option<Duration>,
}

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl.or(self.default_ttl)
    }
}

/// Moka-based cache provider
pub struct MokaCacheProvider {
    cache: Cache<String, CachedValue>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MokaCacheProvider {
    /// Create a cache with the default capacity and no default TTL
    pub fn new() -> Self {
        Self::with_config(CACHE_DEFAULT_CAPACITY, None)
    }

    /// Create a cache with explicit capacity and default TTL
    pub fn with_config(capacity: u64, default_ttl: Option<Duration>) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .expire_after(PerEntryTtl { default_ttl })
            .build();
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheProvider for MokaCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        match self.cache.get(key).await {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value.json))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        self.cache
            .insert(
                key.to_string(),
                CachedValue {
                    json: value.to_string(),
                    ttl: config.ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let existed = self.cache.contains_key(key);
        self.cache.invalidate(key).await;
        Ok(existed)
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        self.cache.run_pending_tasks().await;
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        })
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheProvider")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{CACHE_PROVIDERS, CacheProviderEntry};

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "moka",
    description: "Moka concurrent in-memory cache (TTL + LRU)",
    factory: |settings| {
        let capacity = settings
            .capacity
            .map_or(CACHE_DEFAULT_CAPACITY, |c| c as u64);
        Ok(std::sync::Arc::new(MokaCacheProvider::with_config(
            capacity,
            settings.default_ttl,
        )))
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_and_counters() {
        let cache = MokaCacheProvider::new();
        assert_eq!(cache.get_json("k").await.unwrap(), None);
        cache
            .set_json("k", "\"v\"", CacheEntryConfig::default())
            .await
            .unwrap();
        assert_eq!(cache.get_json("k").await.unwrap(), Some("\"v\"".to_string()));

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn per_entry_ttl_expires() {
        let cache = MokaCacheProvider::with_config(100, None);
        cache
            .set_json(
                "short",
                "\"v\"",
                CacheEntryConfig::with_ttl(Duration::from_millis(50)),
            )
            .await
            .unwrap();
        assert!(cache.get_json("short").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get_json("short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let cache = MokaCacheProvider::new();
        cache
            .set_json("k", "\"v\"", CacheEntryConfig::default())
            .await
            .unwrap();
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }
}
