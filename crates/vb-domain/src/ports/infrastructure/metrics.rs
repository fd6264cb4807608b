//! Metrics sink port
//!
//! Counters behind the `GET /performance/metrics` surface. Recording is
//! synchronous and lock-free on the hot path; the snapshot is assembled on
//! demand.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Aggregated usage of one provider
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProviderUsage {
    /// Provider name
    pub provider: String,
    /// Total calls routed to the provider
    pub calls: u64,
    /// Calls that failed
    pub failures: u64,
    /// Accumulated cost in USD
    pub total_cost: f64,
    /// Mean call latency in milliseconds
    pub avg_latency_ms: f64,
}

/// Point-in-time metrics view
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsSnapshot {
    /// Hit rate across all cache tiers, in [0, 1]
    pub cache_hit_rate: f64,
    /// Per-tier hit rates
    pub cache_tiers: HashMap<String, f64>,
    /// Per-provider usage
    pub provider_usage: Vec<ProviderUsage>,
    /// Mean provider-call latency across providers, in milliseconds
    pub avg_latency_ms: f64,
    /// Error counts by taxonomy kind
    pub error_counts: HashMap<String, u64>,
}

/// Engine metrics sink
pub trait MetricsSink: Send + Sync {
    /// Record one provider call with its outcome
    fn record_provider_call(&self, provider: &str, latency_ms: u64, cost: f64, success: bool);

    /// Record a fallback hop from one provider to the next
    fn record_fallback(&self, from: &str, to: &str);

    /// Record a cache lookup on a tier
    fn record_cache_access(&self, tier: &str, hit: bool);

    /// Record an error by taxonomy kind
    fn record_error(&self, kind: &str);

    /// Assemble the current snapshot
    fn snapshot(&self) -> MetricsSnapshot;
}

/// Sink that drops everything (tests, disabled metrics)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetricsSink;

impl MetricsSink for NullMetricsSink {
    fn record_provider_call(&self, _provider: &str, _latency_ms: u64, _cost: f64, _success: bool) {}

    fn record_fallback(&self, _from: &str, _to: &str) {}

    fn record_cache_access(&self, _tier: &str, _hit: bool) {}

    fn record_error(&self, _kind: &str) {}

    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::default()
    }
}
