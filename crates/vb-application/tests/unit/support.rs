//! Shared fixtures for the unit suite
//!
//! Stub providers with observable call counts, plus wiring helpers that
//! assemble the pipeline the way the bootstrap does, but hermetically.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use vb_application::cache::{TieredCache, TieredCacheConfig};
use vb_application::routing::{
    CircuitBreakerConfig, ProviderEndpoint, ProviderRouter, RouterConfig, RoutingSnapshot,
};
use vb_application::services::{CollectionManager, IngestionConfig, IngestionPipeline};
use vb_domain::error::{Error, Result};
use vb_domain::ports::infrastructure::NullMetricsSink;
use vb_domain::ports::providers::EmbeddingProvider;
use vb_domain::value_objects::{Embedding, EmbeddingBatch, SourceRecord};
use vb_providers::cache::MokaCacheProvider;
use vb_providers::ledger::InMemoryBridgeLedger;
use vb_providers::vector_store::InMemoryVectorStore;

/// Deterministic provider with observable call/item counters
pub struct StubProvider {
    name: &'static str,
    dimensions: usize,
    calls: AtomicUsize,
    items: AtomicUsize,
    delay: Option<Duration>,
}

impl StubProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            dimensions: 8,
            calls: AtomicUsize::new(0),
            items: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(name: &'static str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(name)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn items(&self) -> usize {
        self.items.load(Ordering::SeqCst)
    }

    fn embed_text(&self, text: &str) -> Embedding {
        let seed = text.bytes().fold(7u64, |acc, b| {
            acc.wrapping_mul(31).wrapping_add(u64::from(b))
        });
        let vector = (0..self.dimensions)
            .map(|i| {
                let v = seed.wrapping_add(i as u64).wrapping_mul(2654435761);
                (v % 2000) as f32 / 1000.0 - 1.0
            })
            .collect();
        Embedding {
            vector,
            model: format!("{}-model", self.name),
            dimensions: self.dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items.fetch_add(texts.len(), Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let started = Instant::now();
        Ok(EmbeddingBatch {
            embeddings: texts.iter().map(|t| self.embed_text(t)).collect(),
            model: format!("{}-model", self.name),
            provider: self.name.to_string(),
            cost: 0.0,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &str {
        self.name
    }

    fn cost_per_call(&self) -> f64 {
        0.0
    }
}

/// Failure modes for [`FailingProvider`]
#[derive(Clone, Copy)]
pub enum FailureMode {
    Timeout,
    Quota,
    Rejected,
}

/// Provider that fails every call in a configurable way
pub struct FailingProvider {
    name: &'static str,
    mode: FailureMode,
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new(name: &'static str, mode: FailureMode) -> Self {
        Self {
            name,
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed_batch(&self, _texts: &[String]) -> Result<EmbeddingBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.mode {
            FailureMode::Timeout => Error::provider_timeout(self.name, 30_000),
            FailureMode::Quota => Error::provider_rejected(self.name, 429, "quota exceeded"),
            FailureMode::Rejected => Error::provider_rejected(self.name, 400, "payload refused"),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn provider_name(&self) -> &str {
        self.name
    }

    fn cost_per_call(&self) -> f64 {
        0.0
    }
}

/// Endpoint wrapper with sensible defaults
pub fn endpoint(
    name: &str,
    handle: Arc<dyn EmbeddingProvider>,
    priority: u32,
    hosted: bool,
    cost_per_call: f64,
) -> ProviderEndpoint {
    ProviderEndpoint {
        name: name.to_string(),
        handle,
        priority,
        hosted,
        cost_per_call,
        active: true,
    }
}

/// Router with fast retries and a high breaker threshold
pub fn router(snapshot: RoutingSnapshot) -> Arc<ProviderRouter> {
    Arc::new(ProviderRouter::with_config(
        snapshot,
        Arc::new(NullMetricsSink),
        RouterConfig {
            call_timeout: Duration::from_secs(5),
            base_backoff: Duration::from_millis(1),
            max_jitter: Duration::ZERO,
            breaker: CircuitBreakerConfig {
                failure_threshold: 100,
                ..Default::default()
            },
        },
    ))
}

/// Three moka tiers with short-TTL embedding cache support
pub fn cache(embedding_ttl: Duration) -> Arc<TieredCache> {
    Arc::new(TieredCache::new(
        Arc::new(MokaCacheProvider::with_config(1_000, None)),
        Arc::new(MokaCacheProvider::with_config(1_000, None)),
        Arc::new(MokaCacheProvider::with_config(1_000, None)),
        TieredCacheConfig {
            embedding_ttl,
            ..Default::default()
        },
        Arc::new(NullMetricsSink),
    ))
}

/// Everything a pipeline test needs to observe
pub struct PipelineHarness {
    pub pipeline: Arc<IngestionPipeline>,
    pub store: Arc<InMemoryVectorStore>,
    pub ledger: Arc<InMemoryBridgeLedger>,
    pub collections: Arc<CollectionManager>,
    pub cache: Arc<TieredCache>,
}

/// Wire a pipeline around the given router
pub fn pipeline_with(router: Arc<ProviderRouter>, config: IngestionConfig) -> PipelineHarness {
    pipeline_with_cache(router, config, cache(Duration::from_secs(24 * 60 * 60)))
}

/// Wire a pipeline with an explicit cache (for TTL tests)
pub fn pipeline_with_cache(
    router: Arc<ProviderRouter>,
    config: IngestionConfig,
    cache: Arc<TieredCache>,
) -> PipelineHarness {
    let store = Arc::new(InMemoryVectorStore::new());
    let collections = Arc::new(CollectionManager::new(store.clone()));
    let ledger = Arc::new(InMemoryBridgeLedger::new());
    let pipeline = Arc::new(IngestionPipeline::new(
        router,
        Arc::clone(&cache),
        Arc::clone(&collections),
        ledger.clone(),
        Arc::new(NullMetricsSink),
        config,
    ));
    PipelineHarness {
        pipeline,
        store,
        ledger,
        collections,
        cache,
    }
}

/// Synthetic records "1".."=n" with distinct content
pub fn records(n: usize) -> Vec<SourceRecord> {
    (1..=n)
        .map(|i| SourceRecord {
            id: i.to_string(),
            title: format!("Issue {i}"),
            summary: format!("Summary of issue {i}"),
            description: format!("Description body for issue number {i}"),
            fields: std::collections::BTreeMap::new(),
        })
        .collect()
}
