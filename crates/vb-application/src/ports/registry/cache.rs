//! Cache provider registry

use std::sync::Arc;
use std::time::Duration;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::CacheProvider;

/// Configuration for cache provider creation
///
/// One backend instance is created per cache tier, each with its own
/// capacity and default TTL.
#[derive(Debug, Clone, Default)]
pub struct CacheProviderSettings {
    /// Provider name (e.g. "moka", "null")
    pub provider: String,
    /// Maximum entries before LRU eviction
    pub capacity: Option<usize>,
    /// Default time to live for entries without an explicit one
    pub default_ttl: Option<Duration>,
}

impl CacheProviderSettings {
    /// Create settings for the named provider
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the entry capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the default TTL
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }
}

/// Registry entry for cache providers
pub struct CacheProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&CacheProviderSettings) -> Result<Arc<dyn CacheProvider>>,
}

#[linkme::distributed_slice]
pub static CACHE_PROVIDERS: [CacheProviderEntry] = [..];

/// Resolve a cache provider by name from the registry
pub fn resolve_cache_provider(settings: &CacheProviderSettings) -> Result<Arc<dyn CacheProvider>> {
    for entry in CACHE_PROVIDERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }

    let available: Vec<&str> = CACHE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(Error::config(format!(
        "unknown cache provider '{}', available: {available:?}",
        settings.provider
    )))
}

/// List all registered cache providers as (name, description) pairs
pub fn list_cache_providers() -> Vec<(&'static str, &'static str)> {
    CACHE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
