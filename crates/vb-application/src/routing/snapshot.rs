//! Routing snapshots
//!
//! Provider configuration reaches the router as a versioned, immutable
//! snapshot. Hot reload builds a new snapshot and swaps it atomically;
//! nothing mutates shared routing state in place.

use std::collections::HashMap;
use std::sync::Arc;

use vb_domain::ports::providers::EmbeddingProvider;
use vb_domain::value_objects::{RoutePreference, TenantId};

/// One routable capability handle
///
/// Wraps a resolved provider with the routing metadata selection policy
/// needs. Endpoints are values in an ordered chain, never names looked up
/// through type-string branching.
#[derive(Clone)]
pub struct ProviderEndpoint {
    /// Provider name (registry name, also used in logs and metrics)
    pub name: String,
    /// The embed capability handle
    pub handle: Arc<dyn EmbeddingProvider>,
    /// Chain position preference; lower is tried first within a class
    pub priority: u32,
    /// Hosted API (true) vs local adapter (false)
    pub hosted: bool,
    /// Estimated cost of one batch call in USD
    pub cost_per_call: f64,
    /// Inactive endpoints are never routed to
    pub active: bool,
}

impl std::fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("hosted", &self.hosted)
            .field("cost_per_call", &self.cost_per_call)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Immutable routing configuration snapshot
#[derive(Debug, Clone)]
pub struct RoutingSnapshot {
    /// Monotonic version, bumped on every reload
    pub version: u64,
    /// Routable endpoints
    endpoints: Vec<ProviderEndpoint>,
    /// Per-tenant preference overrides
    tenant_preferences: HashMap<TenantId, RoutePreference>,
    /// Batch size at which "balanced" switches to the cheapest adapter
    pub balanced_batch_threshold: usize,
}

impl RoutingSnapshot {
    /// Start building a snapshot
    pub fn builder(version: u64) -> SnapshotBuilder {
        SnapshotBuilder {
            version,
            endpoints: Vec::new(),
            tenant_preferences: HashMap::new(),
            balanced_batch_threshold: vb_domain::constants::DEFAULT_BALANCED_BATCH_THRESHOLD,
        }
    }

    /// Effective preference for a tenant
    ///
    /// An explicit per-request preference wins; otherwise the tenant's
    /// configured preference; otherwise the default.
    pub fn preference_for(
        &self,
        tenant_id: TenantId,
        requested: Option<RoutePreference>,
    ) -> RoutePreference {
        requested
            .or_else(|| self.tenant_preferences.get(&tenant_id).copied())
            .unwrap_or_default()
    }

    /// Ordered fallback chain for one request
    ///
    /// The preference decides which class of adapter leads the chain; every
    /// other active endpoint follows as fallback, so a request only fails
    /// once the whole pool is exhausted.
    ///
    /// - `fast`: local adapters first (lowest latency, no cost)
    /// - `quality`: hosted adapters first (highest fidelity)
    /// - `balanced`: batch size at or above the threshold routes to the
    ///   cheapest adapter to bound cost, below it to the hosted adapter
    pub fn chain(&self, preference: RoutePreference, batch_size: usize) -> Vec<ProviderEndpoint> {
        let mut chain: Vec<ProviderEndpoint> =
            self.endpoints.iter().filter(|e| e.active).cloned().collect();

        match preference {
            RoutePreference::Fast => {
                chain.sort_by(|a, b| {
                    (a.hosted, a.priority).cmp(&(b.hosted, b.priority))
                });
            }
            RoutePreference::Quality => {
                chain.sort_by(|a, b| {
                    (!a.hosted, a.priority).cmp(&(!b.hosted, b.priority))
                });
            }
            RoutePreference::Balanced => {
                if batch_size >= self.balanced_batch_threshold {
                    chain.sort_by(|a, b| {
                        a.cost_per_call
                            .partial_cmp(&b.cost_per_call)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(a.priority.cmp(&b.priority))
                    });
                } else {
                    chain.sort_by(|a, b| {
                        (!a.hosted, a.priority).cmp(&(!b.hosted, b.priority))
                    });
                }
            }
        }

        chain
    }

    /// All configured endpoints, active or not
    pub fn endpoints(&self) -> &[ProviderEndpoint] {
        &self.endpoints
    }

    /// Dimensions of the leading adapter for a preference
    ///
    /// Used to size collections before the first embedding of a job exists.
    pub fn leading_dimensions(&self, preference: RoutePreference, batch_size: usize) -> Option<usize> {
        self.chain(preference, batch_size)
            .first()
            .map(|e| e.handle.dimensions())
    }
}

/// Builder for [`RoutingSnapshot`]
pub struct SnapshotBuilder {
    version: u64,
    endpoints: Vec<ProviderEndpoint>,
    tenant_preferences: HashMap<TenantId, RoutePreference>,
    balanced_batch_threshold: usize,
}

impl SnapshotBuilder {
    /// Add an endpoint to the pool
    pub fn endpoint(mut self, endpoint: ProviderEndpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Set a tenant's preference override
    pub fn tenant_preference(mut self, tenant_id: TenantId, preference: RoutePreference) -> Self {
        self.tenant_preferences.insert(tenant_id, preference);
        self
    }

    /// Set the balanced-routing batch threshold
    pub fn balanced_batch_threshold(mut self, threshold: usize) -> Self {
        self.balanced_batch_threshold = threshold;
        self
    }

    /// Finish the snapshot
    pub fn build(mut self) -> RoutingSnapshot {
        self.endpoints.sort_by_key(|e| e.priority);
        RoutingSnapshot {
            version: self.version,
            endpoints: self.endpoints,
            tenant_preferences: self.tenant_preferences,
            balanced_batch_threshold: self.balanced_batch_threshold,
        }
    }
}
