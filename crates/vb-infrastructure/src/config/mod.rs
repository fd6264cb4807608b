//! Configuration
//!
//! Typed configuration sections, the figment-based loader, and the file
//! watcher driving hot reload.

pub mod loader;
pub mod types;
pub mod watcher;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, CacheSettings, EmbeddingEndpointSettings, IngestionSettings, LedgerSettings,
    LoggingSettings, ProvidersSettings, QuerySettings, ReconciliationSettings, RoutingSettings,
    ServerSettings, VectorStoreSettings,
};
pub use watcher::ConfigWatcher;
