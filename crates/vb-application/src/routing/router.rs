//! Provider router
//!
//! Selects an embedding adapter per request from the active routing
//! snapshot and walks the fallback chain on transient failure. Every call
//! is bounded by a timeout, retried once with jittered backoff, and
//! recorded in the metrics sink with provider, latency, and cost.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use rand::Rng;
use tracing::{debug, info, warn};

use vb_domain::constants::{
    PROVIDER_CALL_TIMEOUT_SECS, RETRY_BASE_BACKOFF_MS, RETRY_JITTER_MS,
};
use vb_domain::error::{Error, Result};
use vb_domain::ports::infrastructure::MetricsSink;
use vb_domain::value_objects::{EmbeddingBatch, RoutePreference, TenantId};

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use super::snapshot::{ProviderEndpoint, RoutingSnapshot};

/// Router tuning knobs
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Deadline for one provider call
    pub call_timeout: Duration,
    /// Backoff before the single in-adapter retry
    pub base_backoff: Duration,
    /// Upper bound of the random jitter added to the backoff
    pub max_jitter: Duration,
    /// Breaker configuration applied to every endpoint
    pub breaker: CircuitBreakerConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(PROVIDER_CALL_TIMEOUT_SECS),
            base_backoff: Duration::from_millis(RETRY_BASE_BACKOFF_MS),
            max_jitter: Duration::from_millis(RETRY_JITTER_MS),
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

/// Cost/latency-aware embedding router with ordered fallback
pub struct ProviderRouter {
    snapshot: ArcSwap<RoutingSnapshot>,
    config: RouterConfig,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    metrics: Arc<dyn MetricsSink>,
}

impl ProviderRouter {
    /// Create a router over an initial snapshot
    pub fn new(snapshot: RoutingSnapshot, metrics: Arc<dyn MetricsSink>) -> Self {
        Self::with_config(snapshot, metrics, RouterConfig::default())
    }

    /// Create a router with custom tuning
    pub fn with_config(
        snapshot: RoutingSnapshot,
        metrics: Arc<dyn MetricsSink>,
        config: RouterConfig,
    ) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(snapshot),
            config,
            breakers: DashMap::new(),
            metrics,
        }
    }

    /// Atomically install a new routing snapshot (hot reload)
    ///
    /// In-flight requests finish on the snapshot they loaded; new requests
    /// see the new one. No restart, no locks.
    pub fn install_snapshot(&self, snapshot: RoutingSnapshot) {
        info!(version = snapshot.version, "routing snapshot installed");
        self.snapshot.store(Arc::new(snapshot));
    }

    /// The currently active snapshot
    pub fn current_snapshot(&self) -> Arc<RoutingSnapshot> {
        self.snapshot.load_full()
    }

    /// Ordered provider names a request would try, for observability
    pub fn selection_order(
        &self,
        tenant_id: TenantId,
        preference: Option<RoutePreference>,
        batch_size: usize,
    ) -> Vec<String> {
        let snapshot = self.snapshot.load();
        let preference = snapshot.preference_for(tenant_id, preference);
        snapshot
            .chain(preference, batch_size)
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    /// Embed a batch of texts through the fallback chain
    ///
    /// Walks the chain the active snapshot orders for this tenant and
    /// preference. Per adapter: one call bounded by the timeout, one retry
    /// with jittered backoff on a transient failure, then the next adapter.
    /// Rejections other than quota propagate immediately since no adapter
    /// will accept the same payload. An exhausted chain is
    /// `ProviderExhausted`.
    pub async fn embed_batch(
        &self,
        tenant_id: TenantId,
        texts: &[String],
        preference: Option<RoutePreference>,
    ) -> Result<EmbeddingBatch> {
        if texts.is_empty() {
            return Err(Error::invalid_input("cannot embed an empty batch"));
        }

        let snapshot = self.snapshot.load_full();
        let preference = snapshot.preference_for(tenant_id, preference);
        let chain = snapshot.chain(preference, texts.len());
        if chain.is_empty() {
            return Err(Error::provider_exhausted("embed", &[]));
        }

        let mut attempted = Vec::with_capacity(chain.len());
        let mut previous: Option<String> = None;

        for endpoint in &chain {
            let breaker = self.breaker_for(&endpoint.name);
            if !breaker.allows_request().await {
                debug!(provider = %endpoint.name, "skipping endpoint, circuit open");
                attempted.push(endpoint.name.clone());
                continue;
            }

            if let Some(from) = &previous {
                self.metrics.record_fallback(from, &endpoint.name);
                warn!(
                    from = %from,
                    to = %endpoint.name,
                    tenant_id,
                    "falling back to next provider in chain"
                );
            }

            match self.try_endpoint(endpoint, texts, &breaker).await {
                Ok(batch) => {
                    debug!(
                        provider = %endpoint.name,
                        preference = %preference,
                        tenant_id,
                        batch = texts.len(),
                        latency_ms = batch.latency_ms,
                        cost = batch.cost,
                        "provider selected"
                    );
                    return Ok(batch);
                }
                Err(e) if e.is_fallback_eligible() => {
                    warn!(provider = %endpoint.name, error = %e, "provider failed, trying next");
                    attempted.push(endpoint.name.clone());
                    previous = Some(endpoint.name.clone());
                }
                Err(e) => {
                    self.metrics.record_error(e.kind());
                    return Err(e);
                }
            }
        }

        let err = Error::provider_exhausted("embed", &attempted);
        self.metrics.record_error(err.kind());
        Err(err)
    }

    /// One adapter: timed call, single retry with backoff on transience
    async fn try_endpoint(
        &self,
        endpoint: &ProviderEndpoint,
        texts: &[String],
        breaker: &CircuitBreaker,
    ) -> Result<EmbeddingBatch> {
        match self.timed_call(endpoint, texts, breaker).await {
            Err(e) if e.is_fallback_eligible() => {
                let backoff = self.config.base_backoff + self.jitter();
                debug!(
                    provider = %endpoint.name,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying after backoff"
                );
                tokio::time::sleep(backoff).await;
                self.timed_call(endpoint, texts, breaker).await
            }
            other => other,
        }
    }

    async fn timed_call(
        &self,
        endpoint: &ProviderEndpoint,
        texts: &[String],
        breaker: &CircuitBreaker,
    ) -> Result<EmbeddingBatch> {
        let started = std::time::Instant::now();
        let outcome = tokio::time::timeout(self.config.call_timeout, endpoint.handle.embed_batch(texts))
            .await
            .unwrap_or_else(|_| {
                Err(Error::provider_timeout(
                    &endpoint.name,
                    self.config.call_timeout.as_millis() as u64,
                ))
            });
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(batch) => {
                breaker.record_success().await;
                self.metrics
                    .record_provider_call(&endpoint.name, batch.latency_ms, batch.cost, true);
                Ok(batch)
            }
            Err(e) => {
                breaker.record_failure().await;
                self.metrics
                    .record_provider_call(&endpoint.name, latency_ms, 0.0, false);
                Err(e)
            }
        }
    }

    fn breaker_for(&self, name: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(CircuitBreaker::with_config(
                    name,
                    self.config.breaker.clone(),
                ))
            })
            .clone()
    }

    fn jitter(&self) -> Duration {
        let max = self.config.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max))
    }
}
