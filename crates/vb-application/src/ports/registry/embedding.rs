//! Embedding provider registry
//!
//! Providers register themselves via `#[linkme::distributed_slice]` and
//! are discovered at runtime by name.

use std::collections::HashMap;
use std::sync::Arc;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::EmbeddingProvider;

/// Configuration for embedding provider creation
///
/// Carries every option an adapter might need; adapters use what they need
/// and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingProviderConfig {
    /// Provider name (e.g. "ollama", "openai", "null")
    pub provider: String,
    /// Model name
    pub model: Option<String>,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Base URL for the provider API
    pub base_url: Option<String>,
    /// Embedding dimensions (if configurable)
    pub dimensions: Option<usize>,
    /// Estimated cost of one batch call in USD
    pub cost_per_call: Option<f64>,
    /// Additional provider-specific configuration
    pub extra: HashMap<String, String>,
}

impl EmbeddingProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the dimensions
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set the per-call cost estimate
    pub fn with_cost_per_call(mut self, cost: f64) -> Self {
        self.cost_per_call = Some(cost);
        self
    }
}

/// Registry entry for embedding providers
pub struct EmbeddingProviderEntry {
    /// Unique provider name (e.g. "ollama", "openai", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&EmbeddingProviderConfig) -> Result<Arc<dyn EmbeddingProvider>>,
}

// Auto-collection via linkme - providers submit entries at compile time
#[linkme::distributed_slice]
pub static EMBEDDING_PROVIDERS: [EmbeddingProviderEntry] = [..];

/// Resolve an embedding provider by name from the registry
pub fn resolve_embedding_provider(
    config: &EmbeddingProviderConfig,
) -> Result<Arc<dyn EmbeddingProvider>> {
    for entry in EMBEDDING_PROVIDERS {
        if entry.name == config.provider {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = EMBEDDING_PROVIDERS.iter().map(|e| e.name).collect();
    Err(Error::config(format!(
        "unknown embedding provider '{}', available: {available:?}",
        config.provider
    )))
}

/// List all registered embedding providers as (name, description) pairs
pub fn list_embedding_providers() -> Vec<(&'static str, &'static str)> {
    EMBEDDING_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
