//! Provider registry system
//!
//! Auto-registration infrastructure for pluggable providers, built on
//! `linkme` distributed slices. Each adapter in `vb-providers` submits a
//! registry entry at compile time; configuration selects one by name at
//! runtime, so the engine never branches on provider-type strings.
//!
//! ## Usage
//!
//! ### Registering a provider (in vb-providers)
//!
//! ```ignore
//! #[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
//! static OLLAMA_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
//!     name: "ollama",
//!     description: "Ollama local embedding provider",
//!     factory: |config| Ok(Arc::new(OllamaEmbeddingProvider::from_config(config)?)),
//! };
//! ```
//!
//! ### Resolving a provider (in vb-infrastructure)
//!
//! ```ignore
//! let config = EmbeddingProviderConfig::new("ollama").with_model("nomic-embed-text");
//! let provider = resolve_embedding_provider(&config)?;
//! ```

pub mod cache;
pub mod embedding;
pub mod ledger;
pub mod vector_store;

pub use cache::{
    CACHE_PROVIDERS, CacheProviderSettings, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};
pub use embedding::{
    EMBEDDING_PROVIDERS, EmbeddingProviderConfig, EmbeddingProviderEntry,
    list_embedding_providers, resolve_embedding_provider,
};
pub use ledger::{
    BRIDGE_LEDGERS, BridgeLedgerEntry, BridgeLedgerSettings, list_bridge_ledgers,
    resolve_bridge_ledger,
};
pub use vector_store::{
    VECTOR_STORE_PROVIDERS, VectorStoreProviderEntry, VectorStoreSettings,
    list_vector_store_providers, resolve_vector_store_provider,
};
