//! Multi-tier caching

pub mod tiers;

pub use tiers::{EmbeddingLookup, TieredCache, TieredCacheConfig};
