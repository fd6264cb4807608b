//! Engine bootstrap
//!
//! Resolves providers through the registries, builds the routing snapshot,
//! and wires the cache tiers, collection manager, pipeline, query service,
//! and reconciler into one context. A configuration reload rebuilds the
//! routing snapshot and swaps it atomically; nothing restarts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::info;

use vb_application::cache::{TieredCache, TieredCacheConfig};
use vb_application::ports::registry::{
    BridgeLedgerSettings, CacheProviderSettings, EmbeddingProviderConfig, VectorStoreSettings,
    resolve_bridge_ledger, resolve_cache_provider, resolve_embedding_provider,
    resolve_vector_store_provider,
};
use vb_application::routing::{
    CircuitBreakerConfig, ProviderEndpoint, ProviderRouter, RouterConfig, RoutingSnapshot,
};
use vb_application::services::{
    CollectionManager, FlushPolicy, IngestionConfig, IngestionPipeline, QueryConfig, QueryService,
    RecordBuffer, ReconcilePolicy, Reconciler,
};
use vb_domain::error::Result;
use vb_domain::ports::infrastructure::{BridgeLedger, MetricsSink};
use vb_domain::value_objects::{RoutePreference, VectorType};

use crate::config::{AppConfig, ConfigWatcher};
use crate::metrics::EngineMetrics;

/// The wired engine
pub struct EngineContext {
    config: Arc<ConfigWatcher>,
    metrics: Arc<EngineMetrics>,
    router: Arc<ProviderRouter>,
    cache: Arc<TieredCache>,
    collections: Arc<CollectionManager>,
    ledger: Arc<dyn BridgeLedger>,
    pipeline: Arc<IngestionPipeline>,
    queries: Arc<QueryService>,
    reconciler: Arc<Reconciler>,
    buffer: Arc<RecordBuffer>,
    snapshot_version: AtomicU64,
}

impl EngineContext {
    /// Build the engine from the current configuration
    ///
    /// Registers a reload listener on the watcher, so subsequent
    /// configuration changes swap the routing snapshot without a restart.
    pub fn build(config_watcher: Arc<ConfigWatcher>) -> Result<Arc<Self>> {
        let config = config_watcher.get_config();
        let metrics = Arc::new(EngineMetrics::new());
        let metrics_sink: Arc<dyn MetricsSink> = Arc::clone(&metrics) as Arc<dyn MetricsSink>;

        let cache = Arc::new(build_cache_tiers(&config, Arc::clone(&metrics_sink))?);

        let store = resolve_vector_store_provider(&VectorStoreSettings {
            provider: config.providers.vector_store.provider.clone(),
            url: config.providers.vector_store.url.clone(),
            api_key: config.providers.vector_store.api_key.clone(),
        })?;
        let collections = Arc::new(CollectionManager::new(store));

        let ledger = resolve_bridge_ledger(&BridgeLedgerSettings {
            provider: config.providers.ledger.provider.clone(),
            connection: config.providers.ledger.connection.clone(),
        })?;

        let snapshot = build_routing_snapshot(&config, 1)?;
        let router = Arc::new(ProviderRouter::with_config(
            snapshot,
            Arc::clone(&metrics_sink),
            RouterConfig {
                call_timeout: Duration::from_secs(config.routing.call_timeout_secs),
                base_backoff: Duration::from_millis(config.routing.base_backoff_ms),
                max_jitter: Duration::from_millis(config.routing.max_jitter_ms),
                breaker: CircuitBreakerConfig::default(),
            },
        ));

        let pipeline = Arc::new(IngestionPipeline::new(
            Arc::clone(&router),
            Arc::clone(&cache),
            Arc::clone(&collections),
            Arc::clone(&ledger),
            Arc::clone(&metrics_sink),
            IngestionConfig {
                batch_min: config.ingestion.batch_min,
                batch_max: config.ingestion.batch_max,
                concurrency: config.ingestion.concurrency,
            },
        ));

        let queries = Arc::new(QueryService::new(
            Arc::clone(&router),
            Arc::clone(&cache),
            Arc::clone(&collections),
            QueryConfig {
                simple_threshold: config.query.simple_threshold,
                concurrency: config.query.concurrency,
            },
        ));

        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&collections),
            Arc::clone(&ledger),
            Arc::clone(&metrics_sink),
        ));

        let buffer = Arc::new(RecordBuffer::new(
            Arc::clone(&pipeline),
            FlushPolicy {
                max_pending: config.ingestion.flush_max_pending,
                max_wait: Duration::from_secs(config.ingestion.flush_max_wait_secs),
            },
            VectorType::Content,
            RoutePreference::default(),
        ));

        let engine = Arc::new(Self {
            config: Arc::clone(&config_watcher),
            metrics,
            router,
            cache,
            collections,
            ledger,
            pipeline,
            queries,
            reconciler,
            buffer,
            snapshot_version: AtomicU64::new(1),
        });

        let reload_target = Arc::clone(&engine);
        config_watcher.on_reload(move |new_config| {
            reload_target.apply_config(new_config);
        });

        info!("engine context built");
        Ok(engine)
    }

    /// Rebuild and swap the routing snapshot from a new configuration
    ///
    /// Provider resolution failures leave the previous snapshot active.
    pub fn apply_config(&self, config: &AppConfig) {
        let version = self.snapshot_version.load(Ordering::SeqCst) + 1;
        match build_routing_snapshot(config, version) {
            Ok(snapshot) => {
                self.snapshot_version.store(version, Ordering::SeqCst);
                self.router.install_snapshot(snapshot);
            }
            Err(e) => tracing::error!(error = %e, "new configuration rejected, keeping routing snapshot"),
        }
    }

    /// Configuration holder
    pub fn config(&self) -> &Arc<ConfigWatcher> {
        &self.config
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    /// Provider router
    pub fn router(&self) -> &Arc<ProviderRouter> {
        &self.router
    }

    /// Cache tiers
    pub fn cache(&self) -> &Arc<TieredCache> {
        &self.cache
    }

    /// Collection manager
    pub fn collections(&self) -> &Arc<CollectionManager> {
        &self.collections
    }

    /// Bridge ledger
    pub fn ledger(&self) -> &Arc<dyn BridgeLedger> {
        &self.ledger
    }

    /// Ingestion pipeline
    pub fn pipeline(&self) -> &Arc<IngestionPipeline> {
        &self.pipeline
    }

    /// Query service
    pub fn queries(&self) -> &Arc<QueryService> {
        &self.queries
    }

    /// Reconciliation pass
    pub fn reconciler(&self) -> &Arc<Reconciler> {
        &self.reconciler
    }

    /// Record buffer consuming `on_record_persisted`
    pub fn buffer(&self) -> &Arc<RecordBuffer> {
        &self.buffer
    }
}

/// Build the three cache tiers from one backend provider
fn build_cache_tiers(config: &AppConfig, metrics: Arc<dyn MetricsSink>) -> Result<TieredCache> {
    let tier = |ttl_secs: u64| {
        resolve_cache_provider(
            &CacheProviderSettings::new(config.cache.provider.clone())
                .with_capacity(config.cache.capacity)
                .with_default_ttl(Duration::from_secs(ttl_secs)),
        )
    };

    Ok(TieredCache::new(
        tier(config.cache.embedding_ttl_secs)?,
        tier(config.cache.context_ttl_secs)?,
        tier(config.cache.result_ttl_secs)?,
        TieredCacheConfig {
            embedding_ttl: Duration::from_secs(config.cache.embedding_ttl_secs),
            context_ttl: Duration::from_secs(config.cache.context_ttl_secs),
            result_ttl: Duration::from_secs(config.cache.result_ttl_secs),
            negative_ttl: config.cache.negative_ttl_secs.map(Duration::from_secs),
        },
        metrics,
    ))
}

/// Resolve the configured endpoint pool into a routing snapshot
pub fn build_routing_snapshot(config: &AppConfig, version: u64) -> Result<RoutingSnapshot> {
    let mut builder = RoutingSnapshot::builder(version)
        .balanced_batch_threshold(config.routing.balanced_batch_threshold);

    for endpoint in &config.providers.embedding {
        let mut provider_config = EmbeddingProviderConfig::new(endpoint.provider.clone())
            .with_cost_per_call(endpoint.cost_per_call);
        if let Some(model) = &endpoint.model {
            provider_config = provider_config.with_model(model.clone());
        }
        if let Some(api_key) = &endpoint.api_key {
            provider_config = provider_config.with_api_key(api_key.clone());
        }
        if let Some(base_url) = &endpoint.base_url {
            provider_config = provider_config.with_base_url(base_url.clone());
        }
        if let Some(dimensions) = endpoint.dimensions {
            provider_config = provider_config.with_dimensions(dimensions);
        }

        let handle = resolve_embedding_provider(&provider_config)?;
        builder = builder.endpoint(ProviderEndpoint {
            name: endpoint.provider.clone(),
            handle,
            priority: endpoint.priority,
            hosted: endpoint.hosted,
            cost_per_call: endpoint.cost_per_call,
            active: endpoint.active,
        });
    }

    for (tenant, preference) in &config.routing.tenant_preferences {
        let tenant_id = tenant
            .parse::<u64>()
            .map_err(|_| vb_domain::error::Error::config(format!("tenant id '{tenant}' is not numeric")))?;
        builder = builder.tenant_preference(tenant_id, preference.parse::<RoutePreference>()?);
    }

    Ok(builder.build())
}
