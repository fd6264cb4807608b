//! Application layer - vectorbridge
//!
//! Use cases and policy for the routing and ingestion engine: the provider
//! router with its fallback chains, the tiered cache, the collection
//! manager, the batch ingestion pipeline, the query-complexity router, and
//! the cross-store reconciliation pass.
//!
//! ## Dependencies
//!
//! This crate depends only on `vb-domain` and pure async/runtime libraries.
//! Concrete providers live in `vb-providers` and register themselves into
//! the linkme registry slices declared under [`ports::registry`];
//! `vb-infrastructure` links the provider crate to complete registration.

pub mod cache;
pub mod ports;
pub mod routing;
pub mod services;

pub use cache::{EmbeddingLookup, TieredCache, TieredCacheConfig};
pub use routing::{ProviderRouter, RouterConfig, RoutingSnapshot};
pub use services::{
    CollectionManager, IngestionPipeline, QueryService, Reconciler, RecordBuffer,
};
