//! Cache configuration types

use serde::{Deserialize, Serialize};

use vb_domain::constants::{
    CACHE_DEFAULT_CAPACITY, CONTEXT_CACHE_TTL_SECS, EMBEDDING_CACHE_TTL_SECS,
    RESULT_CACHE_TTL_SECS,
};

/// Cache tier configuration
///
/// One backend instance is created per tier, all from the same provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Cache backend name ("moka", "null")
    pub provider: String,

    /// Maximum entries per tier before LRU eviction
    pub capacity: usize,

    /// Embedding tier TTL in seconds
    pub embedding_ttl_secs: u64,

    /// Context tier TTL in seconds
    pub context_ttl_secs: u64,

    /// Result tier TTL in seconds
    pub result_ttl_secs: u64,

    /// TTL for rejected-content tombstones; unset disables negative caching
    pub negative_ttl_secs: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            provider: "moka".to_string(),
            capacity: CACHE_DEFAULT_CAPACITY,
            embedding_ttl_secs: EMBEDDING_CACHE_TTL_SECS,
            context_ttl_secs: CONTEXT_CACHE_TTL_SECS,
            result_ttl_secs: RESULT_CACHE_TTL_SECS,
            negative_ttl_secs: None,
        }
    }
}
