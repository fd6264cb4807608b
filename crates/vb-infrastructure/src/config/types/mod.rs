//! Configuration types
//!
//! One struct per section, each with serde defaults so a partial TOML file
//! or a handful of `VB_`-prefixed environment variables is enough.

pub mod cache;
pub mod logging;
pub mod pipeline;
pub mod providers;
pub mod server;

pub use cache::CacheSettings;
pub use logging::LoggingSettings;
pub use pipeline::{IngestionSettings, QuerySettings, ReconciliationSettings};
pub use providers::{
    EmbeddingEndpointSettings, LedgerSettings, ProvidersSettings, RoutingSettings,
    VectorStoreSettings,
};
pub use server::ServerSettings;

use serde::{Deserialize, Serialize};

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server section
    #[serde(default)]
    pub server: ServerSettings,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Cache tier section
    #[serde(default)]
    pub cache: CacheSettings,

    /// Provider routing section
    #[serde(default)]
    pub routing: RoutingSettings,

    /// Ingestion pipeline section
    #[serde(default)]
    pub ingestion: IngestionSettings,

    /// Interactive query section
    #[serde(default)]
    pub query: QuerySettings,

    /// Reconciliation cadence section
    #[serde(default)]
    pub reconciliation: ReconciliationSettings,

    /// Backend providers section
    #[serde(default)]
    pub providers: ProvidersSettings,
}
