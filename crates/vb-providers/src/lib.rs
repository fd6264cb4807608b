//! Provider implementations - vectorbridge
//!
//! Every user-selectable backend adapter lives here. Each implements a
//! port from `vb-domain` and registers itself into the matching linkme
//! registry slice in `vb-application`, so configuration picks providers
//! by name and the engine never branches on type strings.
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Embedding | `EmbeddingProvider` | OpenAI, Gemini, Ollama, Null |
//! | Vector store | `VectorStoreProvider` | InMemory, Null |
//! | Cache | `CacheProvider` | Moka, Null |
//! | Bridge ledger | `BridgeLedger` | InMemory, Null |

pub use vb_domain::error::{Error, Result};
pub use vb_domain::ports::infrastructure::BridgeLedger;
pub use vb_domain::ports::providers::{CacheProvider, EmbeddingProvider, VectorStoreProvider};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Embedding provider implementations
pub mod embedding;

/// Vector store provider implementations
pub mod vector_store;

/// Cache provider implementations
pub mod cache;

/// Bridge ledger implementations
pub mod ledger;
