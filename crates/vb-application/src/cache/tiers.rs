//! Tiered cache façade
//!
//! Three independent TTL+LRU caches over the `CacheProvider` port: an
//! embedding cache (~24h), a tenant context cache (~2h), and a query
//! result cache (~1h). Every key is tenant-prefixed so no entry can leak
//! across tenants, and every value is keyed by a fingerprint of normalized
//! input rather than raw text.
//!
//! Writes happen only after the corresponding computation succeeds. The
//! one exception is the optional negative cache: when configured, content
//! a provider permanently rejected is tombstoned so it is not retried on
//! every ingest.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use vb_domain::constants::{
    CONTEXT_CACHE_TTL_SECS, EMBEDDING_CACHE_TTL_SECS, RESULT_CACHE_TTL_SECS,
};
use vb_domain::error::Result;
use vb_domain::fingerprint::{content_fingerprint, query_fingerprint};
use vb_domain::ports::infrastructure::MetricsSink;
use vb_domain::ports::providers::{CacheEntryConfig, CacheProvider, CacheStats};
use vb_domain::value_objects::{Embedding, SearchMatch, TenantId};

/// Per-tier TTLs and the negative-caching extension point
#[derive(Debug, Clone)]
pub struct TieredCacheConfig {
    /// Embedding cache TTL
    pub embedding_ttl: Duration,
    /// Context cache TTL
    pub context_ttl: Duration,
    /// Result cache TTL
    pub result_ttl: Duration,
    /// TTL for rejected-content tombstones; `None` disables negative caching
    pub negative_ttl: Option<Duration>,
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            embedding_ttl: Duration::from_secs(EMBEDDING_CACHE_TTL_SECS),
            context_ttl: Duration::from_secs(CONTEXT_CACHE_TTL_SECS),
            result_ttl: Duration::from_secs(RESULT_CACHE_TTL_SECS),
            negative_ttl: None,
        }
    }
}

/// Outcome of an embedding-cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingLookup {
    /// Nothing cached; the provider must be called
    Miss,
    /// Cached embedding; the provider call is skipped
    Hit(Embedding),
    /// Content is tombstoned as permanently rejected
    NegativeHit,
}

/// Stored embedding-tier value
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum EmbeddingEntry {
    Embedded { embedding: Embedding },
    Rejected,
}

/// The three process-wide cache tiers
pub struct TieredCache {
    embedding: Arc<dyn CacheProvider>,
    context: Arc<dyn CacheProvider>,
    result: Arc<dyn CacheProvider>,
    config: TieredCacheConfig,
    metrics: Arc<dyn MetricsSink>,
}

impl TieredCache {
    /// Assemble the tiers from three backend instances
    pub fn new(
        embedding: Arc<dyn CacheProvider>,
        context: Arc<dyn CacheProvider>,
        result: Arc<dyn CacheProvider>,
        config: TieredCacheConfig,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            embedding,
            context,
            result,
            config,
            metrics,
        }
    }

    /// Look up a cached embedding for (tenant, content)
    pub async fn get_embedding(&self, tenant_id: TenantId, text: &str) -> Result<EmbeddingLookup> {
        let key = embedding_key(tenant_id, text);
        let lookup = match self.embedding.get_json(&key).await? {
            Some(json) => match serde_json::from_str::<EmbeddingEntry>(&json)? {
                EmbeddingEntry::Embedded { embedding } => EmbeddingLookup::Hit(embedding),
                EmbeddingEntry::Rejected => EmbeddingLookup::NegativeHit,
            },
            None => EmbeddingLookup::Miss,
        };
        self.metrics
            .record_cache_access("embedding", !matches!(lookup, EmbeddingLookup::Miss));
        Ok(lookup)
    }

    /// Cache a successfully generated embedding
    pub async fn put_embedding(
        &self,
        tenant_id: TenantId,
        text: &str,
        embedding: &Embedding,
    ) -> Result<()> {
        let entry = EmbeddingEntry::Embedded {
            embedding: embedding.clone(),
        };
        self.embedding
            .set_json(
                &embedding_key(tenant_id, text),
                &serde_json::to_string(&entry)?,
                CacheEntryConfig::with_ttl(self.config.embedding_ttl),
            )
            .await
    }

    /// Tombstone permanently rejected content, if negative caching is on
    pub async fn put_rejected(&self, tenant_id: TenantId, text: &str) -> Result<()> {
        let Some(ttl) = self.config.negative_ttl else {
            return Ok(());
        };
        self.embedding
            .set_json(
                &embedding_key(tenant_id, text),
                &serde_json::to_string(&EmbeddingEntry::Rejected)?,
                CacheEntryConfig::with_ttl(ttl),
            )
            .await
    }

    /// Look up cached results for (tenant, query)
    pub async fn get_result(
        &self,
        tenant_id: TenantId,
        query: &str,
    ) -> Result<Option<Vec<SearchMatch>>> {
        let key = result_key(tenant_id, query);
        let cached = match self.result.get_json(&key).await? {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        self.metrics.record_cache_access("result", cached.is_some());
        Ok(cached)
    }

    /// Cache a successful query result
    pub async fn put_result(
        &self,
        tenant_id: TenantId,
        query: &str,
        matches: &[SearchMatch],
    ) -> Result<()> {
        self.result
            .set_json(
                &result_key(tenant_id, query),
                &serde_json::to_string(matches)?,
                CacheEntryConfig::with_ttl(self.config.result_ttl),
            )
            .await
    }

    /// Look up the tenant's cached retrieval context
    pub async fn get_context(&self, tenant_id: TenantId) -> Result<Option<serde_json::Value>> {
        let cached = match self.context.get_json(&context_key(tenant_id)).await? {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        self.metrics
            .record_cache_access("context", cached.is_some());
        Ok(cached)
    }

    /// Cache the tenant's retrieval context
    pub async fn put_context(&self, tenant_id: TenantId, context: &serde_json::Value) -> Result<()> {
        self.context
            .set_json(
                &context_key(tenant_id),
                &serde_json::to_string(context)?,
                CacheEntryConfig::with_ttl(self.config.context_ttl),
            )
            .await
    }

    /// Aggregated counters per tier: (name, stats)
    pub async fn tier_stats(&self) -> Result<Vec<(&'static str, CacheStats)>> {
        Ok(vec![
            ("embedding", self.embedding.stats().await?),
            ("context", self.context.stats().await?),
            ("result", self.result.stats().await?),
        ])
    }

    /// Drop every entry in every tier
    pub async fn clear(&self) -> Result<()> {
        self.embedding.clear().await?;
        self.context.clear().await?;
        self.result.clear().await?;
        Ok(())
    }
}

fn embedding_key(tenant_id: TenantId, text: &str) -> String {
    format!("emb:{tenant_id}:{}", content_fingerprint(text))
}

fn context_key(tenant_id: TenantId) -> String {
    format!("ctx:{tenant_id}")
}

fn result_key(tenant_id: TenantId, query: &str) -> String {
    format!("res:{tenant_id}:{}", query_fingerprint(query))
}
