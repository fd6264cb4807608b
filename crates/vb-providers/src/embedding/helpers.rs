//! Common helpers for embedding providers

use std::time::{Duration, Instant};

use vb_domain::error::{Error, Result};
use vb_domain::value_objects::{Embedding, EmbeddingBatch};

/// Default timeout for embedding API requests
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(30);

/// Constructor patterns shared across providers
pub mod constructor {
    /// Trim and normalize an API key
    pub fn validate_api_key(api_key: &str) -> String {
        api_key.trim().to_string()
    }

    /// Effective base URL with fallback to the provider default
    pub fn effective_url(provided: Option<&str>, default_url: &str) -> String {
        provided
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_url.to_string())
    }
}

/// Parse one JSON array of numbers into an embedding vector
pub fn parse_vector(value: &serde_json::Value, provider: &str, index: usize) -> Result<Vec<f32>> {
    value
        .as_array()
        .map(|values| {
            values
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                .collect::<Vec<f32>>()
        })
        .ok_or_else(|| {
            Error::network(format!(
                "{provider} returned an invalid embedding for item {index}"
            ))
        })
}

/// Assemble the batch envelope with measured latency
pub fn batch_envelope(
    embeddings: Vec<Embedding>,
    model: &str,
    provider: &str,
    cost_per_call: f64,
    started: Instant,
) -> EmbeddingBatch {
    EmbeddingBatch {
        embeddings,
        model: model.to_string(),
        provider: provider.to_string(),
        cost: cost_per_call,
        latency_ms: started.elapsed().as_millis() as u64,
    }
}
