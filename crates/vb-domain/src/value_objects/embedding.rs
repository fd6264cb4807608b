//! Embedding value objects
//!
//! A single semantic embedding and the batch envelope providers return,
//! carrying the cost/latency metadata the router and metrics consume.

use serde::{Deserialize, Serialize};

/// A vector embedding of one piece of text
///
/// ## Business rules
///
/// - The vector contains at least one element
/// - `dimensions` equals `vector.len()` and matches the owning collection
/// - The model name identifies how the embedding was generated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Name of the model that generated this embedding
    pub model: String,
    /// Dimensionality of the embedding vector
    pub dimensions: usize,
}

/// Result of one provider `embed` call over a batch of texts
///
/// One embedding per input text, in input order, plus the metadata every
/// selection/fallback decision is logged and billed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingBatch {
    /// One embedding per input text, in input order
    pub embeddings: Vec<Embedding>,
    /// Model that served the batch
    pub model: String,
    /// Adapter that served the batch
    pub provider: String,
    /// Cost of the call in the provider's billing unit (USD)
    pub cost: f64,
    /// Wall-clock latency of the call
    pub latency_ms: u64,
}
