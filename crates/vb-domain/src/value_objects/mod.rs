//! Domain value objects
//!
//! Immutable data carried between the engine's components: embeddings,
//! bridge ledger rows, source records, collection specs, search results,
//! ingestion jobs, and routing decisions.

pub mod bridge;
pub mod collection;
pub mod embedding;
pub mod ingestion;
pub mod record;
pub mod routing;
pub mod search;

pub use bridge::{BridgeKey, BridgeRecord};
pub use collection::{CollectionSpec, DistanceMetric};
pub use embedding::{Embedding, EmbeddingBatch};
pub use ingestion::{IngestionJob, ProgressSnapshot};
pub use record::{SourceRecord, VectorType};
pub use routing::{QueryRoute, RoutePreference};
pub use search::{SearchMatch, SearchOutcome};

/// Tenant identifier
///
/// Tenants are fully isolated from each other: they never share cache
/// namespaces or collections, only pool capacity.
pub type TenantId = u64;
