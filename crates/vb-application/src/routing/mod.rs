//! Provider routing
//!
//! Versioned immutable routing snapshots, the provider router with its
//! ordered fallback chains, per-provider circuit breakers, and the
//! query-complexity heuristics.

pub mod circuit_breaker;
pub mod complexity;
pub mod router;
pub mod snapshot;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use complexity::complexity_score;
pub use router::{ProviderRouter, RouterConfig};
pub use snapshot::{ProviderEndpoint, RoutingSnapshot, SnapshotBuilder};
