//! Null cache provider
//!
//! Stores nothing and always misses. Every lookup falls through to the
//! real computation, which makes it the right backend for tests asserting
//! provider-call counts.

use async_trait::async_trait;

use vb_domain::error::Result;
use vb_domain::ports::providers::{CacheEntryConfig, CacheProvider, CacheStats};

/// Null cache provider
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a null cache
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::default())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{CACHE_PROVIDERS, CacheProviderEntry};

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static NULL_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "null",
    description: "No-op cache (always misses)",
    factory: |_settings| Ok(std::sync::Arc::new(NullCacheProvider::new())),
};
