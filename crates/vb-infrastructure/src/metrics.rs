//! Engine metrics collector
//!
//! Lock-free-on-the-hot-path counters behind `GET /performance/metrics`:
//! per-provider usage (calls, failures, cost, latency), per-tier cache hit
//! rates, fallback hops, and error counts by taxonomy kind.

use std::collections::HashMap;

use dashmap::DashMap;

use vb_domain::ports::infrastructure::{MetricsSink, MetricsSnapshot, ProviderUsage};

#[derive(Debug, Default, Clone)]
struct ProviderCounters {
    calls: u64,
    failures: u64,
    total_cost: f64,
    total_latency_ms: u64,
}

#[derive(Debug, Default, Clone)]
struct TierCounters {
    hits: u64,
    misses: u64,
}

/// Concurrent metrics collector
#[derive(Debug, Default)]
pub struct EngineMetrics {
    providers: DashMap<String, ProviderCounters>,
    cache_tiers: DashMap<String, TierCounters>,
    fallbacks: DashMap<String, u64>,
    errors: DashMap<String, u64>,
}

impl EngineMetrics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback hop counts keyed by "from->to"
    pub fn fallback_counts(&self) -> HashMap<String, u64> {
        self.fallbacks
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl MetricsSink for EngineMetrics {
    fn record_provider_call(&self, provider: &str, latency_ms: u64, cost: f64, success: bool) {
        let mut counters = self.providers.entry(provider.to_string()).or_default();
        counters.calls += 1;
        counters.total_cost += cost;
        counters.total_latency_ms += latency_ms;
        if !success {
            counters.failures += 1;
        }
    }

    fn record_fallback(&self, from: &str, to: &str) {
        *self.fallbacks.entry(format!("{from}->{to}")).or_default() += 1;
    }

    fn record_cache_access(&self, tier: &str, hit: bool) {
        let mut counters = self.cache_tiers.entry(tier.to_string()).or_default();
        if hit {
            counters.hits += 1;
        } else {
            counters.misses += 1;
        }
    }

    fn record_error(&self, kind: &str) {
        *self.errors.entry(kind.to_string()).or_default() += 1;
    }

    fn snapshot(&self) -> MetricsSnapshot {
        let provider_usage: Vec<ProviderUsage> = self
            .providers
            .iter()
            .map(|entry| {
                let counters = entry.value();
                ProviderUsage {
                    provider: entry.key().clone(),
                    calls: counters.calls,
                    failures: counters.failures,
                    total_cost: counters.total_cost,
                    avg_latency_ms: if counters.calls > 0 {
                        counters.total_latency_ms as f64 / counters.calls as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        let (total_calls, total_latency) = provider_usage.iter().fold((0u64, 0.0), |acc, u| {
            (acc.0 + u.calls, acc.1 + u.avg_latency_ms * u.calls as f64)
        });
        let avg_latency_ms = if total_calls > 0 {
            total_latency / total_calls as f64
        } else {
            0.0
        };

        let mut cache_tiers = HashMap::new();
        let (mut hits, mut lookups) = (0u64, 0u64);
        for entry in self.cache_tiers.iter() {
            let counters = entry.value();
            let total = counters.hits + counters.misses;
            hits += counters.hits;
            lookups += total;
            cache_tiers.insert(
                entry.key().clone(),
                if total > 0 {
                    counters.hits as f64 / total as f64
                } else {
                    0.0
                },
            );
        }
        let cache_hit_rate = if lookups > 0 {
            hits as f64 / lookups as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            cache_hit_rate,
            cache_tiers,
            provider_usage,
            avg_latency_ms,
            error_counts: self
                .errors
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_counters_aggregate() {
        let metrics = EngineMetrics::new();
        metrics.record_provider_call("openai", 100, 0.001, true);
        metrics.record_provider_call("openai", 300, 0.001, false);
        metrics.record_provider_call("ollama", 50, 0.0, true);

        let snapshot = metrics.snapshot();
        let openai = snapshot
            .provider_usage
            .iter()
            .find(|u| u.provider == "openai")
            .unwrap();
        assert_eq!(openai.calls, 2);
        assert_eq!(openai.failures, 1);
        assert!((openai.avg_latency_ms - 200.0).abs() < f64::EPSILON);
        assert!((openai.total_cost - 0.002).abs() < 1e-9);
    }

    #[test]
    fn cache_hit_rate_spans_tiers() {
        let metrics = EngineMetrics::new();
        metrics.record_cache_access("embedding", true);
        metrics.record_cache_access("embedding", false);
        metrics.record_cache_access("result", true);
        metrics.record_cache_access("result", true);

        let snapshot = metrics.snapshot();
        assert!((snapshot.cache_hit_rate - 0.75).abs() < f64::EPSILON);
        assert!((snapshot.cache_tiers["embedding"] - 0.5).abs() < f64::EPSILON);
        assert!((snapshot.cache_tiers["result"] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn errors_count_by_kind() {
        let metrics = EngineMetrics::new();
        metrics.record_error("provider_timeout");
        metrics.record_error("provider_timeout");
        metrics.record_error("ledger_orphan");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.error_counts["provider_timeout"], 2);
        assert_eq!(snapshot.error_counts["ledger_orphan"], 1);
    }
}
