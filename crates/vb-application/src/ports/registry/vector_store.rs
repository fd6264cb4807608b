//! Vector store provider registry

use std::sync::Arc;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::VectorStoreProvider;

/// Configuration for vector store provider creation
#[derive(Debug, Clone, Default)]
pub struct VectorStoreSettings {
    /// Provider name (e.g. "memory", "null")
    pub provider: String,
    /// Endpoint URL for remote backends
    pub url: Option<String>,
    /// API key for remote backends
    pub api_key: Option<String>,
}

impl VectorStoreSettings {
    /// Create settings for the named provider
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }
}

/// Registry entry for vector store providers
pub struct VectorStoreProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&VectorStoreSettings) -> Result<Arc<dyn VectorStoreProvider>>,
}

#[linkme::distributed_slice]
pub static VECTOR_STORE_PROVIDERS: [VectorStoreProviderEntry] = [..];

/// Resolve a vector store provider by name from the registry
pub fn resolve_vector_store_provider(
    settings: &VectorStoreSettings,
) -> Result<Arc<dyn VectorStoreProvider>> {
    for entry in VECTOR_STORE_PROVIDERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }

    let available: Vec<&str> = VECTOR_STORE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(Error::config(format!(
        "unknown vector store provider '{}', available: {available:?}",
        settings.provider
    )))
}

/// List all registered vector store providers as (name, description) pairs
pub fn list_vector_store_providers() -> Vec<(&'static str, &'static str)> {
    VECTOR_STORE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
