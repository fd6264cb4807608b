//! Null embedding provider
//!
//! Deterministic, hash-based embeddings with no external dependencies.
//! Texts that share content produce identical vectors, which is exactly
//! what cache and search tests need.

use std::time::Instant;

use async_trait::async_trait;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::EmbeddingProvider;
use vb_domain::value_objects::{Embedding, EmbeddingBatch};

use crate::constants::EMBEDDING_DIMENSION_NULL;
use crate::embedding::helpers::batch_envelope;

/// Null embedding provider for testing and development
pub struct NullEmbeddingProvider {
    dimensions: usize,
}

impl NullEmbeddingProvider {
    /// Create a provider with the default dimensions
    pub fn new() -> Self {
        Self {
            dimensions: EMBEDDING_DIMENSION_NULL,
        }
    }

    /// Create a provider producing vectors of a specific size
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Embedding {
        // Deterministic pseudo-embedding seeded by the text's bytes
        let seed = text.bytes().fold(0u64, |acc, b| {
            acc.wrapping_mul(31).wrapping_add(u64::from(b))
        });
        let vector = (0..self.dimensions)
            .map(|i| {
                let v = seed.wrapping_add(i as u64).wrapping_mul(2654435761);
                (v % 2000) as f32 / 1000.0 - 1.0
            })
            .collect();
        Embedding {
            vector,
            model: "null".to_string(),
            dimensions: self.dimensions,
        }
    }
}

impl Default for NullEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        if texts.is_empty() {
            return Err(Error::invalid_input("cannot embed an empty batch"));
        }
        let started = Instant::now();
        let embeddings = texts.iter().map(|t| self.embed_text(t)).collect();
        Ok(batch_envelope(embeddings, "null", "null", 0.0, started))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &str {
        "null"
    }

    fn cost_per_call(&self) -> f64 {
        0.0
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{EMBEDDING_PROVIDERS, EmbeddingProviderEntry};

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static NULL_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "null",
    description: "Deterministic hash-based embeddings (testing, development)",
    factory: |config| {
        let provider = match config.dimensions {
            Some(dimensions) => NullEmbeddingProvider::with_dimensions(dimensions),
            None => NullEmbeddingProvider::new(),
        };
        Ok(std::sync::Arc::new(provider))
    },
};
