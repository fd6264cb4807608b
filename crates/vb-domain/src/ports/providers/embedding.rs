//! Embedding capability port
//!
//! Uniform wrapper over one concrete AI backend. Every adapter exposes the
//! single `embed` capability plus the cost/latency metadata the router
//! needs; the backend behind it (hosted API, local daemon, test double) is
//! invisible to callers.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::value_objects::EmbeddingBatch;

/// Embedding capability adapter
///
/// Adapters implement `embed_batch`; single-text `embed` has a default
/// implementation delegating to it. Batch calls are the unit the router
/// amortizes over, so providers should accept the whole slice in one
/// upstream request where the backend allows it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per text, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch>;

    /// Embed a single text (default implementation provided)
    async fn embed(&self, text: &str) -> Result<EmbeddingBatch> {
        let texts = [text.to_string()];
        let batch = self.embed_batch(&texts).await?;
        if batch.embeddings.is_empty() {
            return Err(Error::internal(format!(
                "provider '{}' returned no embedding",
                self.provider_name()
            )));
        }
        Ok(batch)
    }

    /// Dimensionality of the vectors this adapter produces
    fn dimensions(&self) -> usize;

    /// Identifier of this adapter (e.g. "openai", "ollama", "null")
    fn provider_name(&self) -> &str;

    /// Estimated cost of one batch call in USD (0.0 for local adapters)
    fn cost_per_call(&self) -> f64;

    /// Health check (default: embed a trivial probe text)
    async fn health_check(&self) -> Result<()> {
        self.embed("health check").await?;
        Ok(())
    }
}
