//! Ollama embedding provider
//!
//! Implements the `EmbeddingProvider` port over a local Ollama server.
//! The no-cost local adapter; "fast" routing and large "balanced" batches
//! prefer it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::EmbeddingProvider;
use vb_domain::value_objects::{Embedding, EmbeddingBatch};

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_OLLAMA_DEFAULT, EMBEDDING_DIMENSION_OLLAMA_MINILM,
    EMBEDDING_DIMENSION_OLLAMA_MXBAI, EMBEDDING_DIMENSION_OLLAMA_NOMIC, OLLAMA_DEFAULT_BASE_URL,
    OLLAMA_DEFAULT_MODEL,
};
use crate::embedding::helpers::{batch_envelope, constructor, parse_vector};
use crate::utils::http_response::{check_and_parse, map_transport_error};

/// Ollama embedding provider
pub struct OllamaEmbeddingProvider {
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OllamaEmbeddingProvider {
    /// Create a new Ollama embedding provider
    pub fn new(
        base_url: Option<String>,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: constructor::effective_url(base_url.as_deref(), OLLAMA_DEFAULT_BASE_URL),
            model,
            timeout,
            http_client,
        }
    }

    /// Model name served by this adapter
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn fetch_embeddings(&self, texts: &[String]) -> Result<serde_json::Value> {
        // /api/embed accepts a batch of inputs in one call
        let payload = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .http_client
            .post(format!("{}/api/embed", self.base_url))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "ollama", self.timeout.as_millis() as u64))?;

        check_and_parse(response, "ollama").await
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        if texts.is_empty() {
            return Err(Error::invalid_input("cannot embed an empty batch"));
        }

        let started = Instant::now();
        let response = self.fetch_embeddings(texts).await?;

        let data = response["embeddings"]
            .as_array()
            .ok_or_else(|| Error::network("ollama response missing embeddings array"))?;
        if data.len() != texts.len() {
            return Err(Error::network(format!(
                "ollama returned {} embeddings for {} inputs",
                data.len(),
                texts.len()
            )));
        }

        let embeddings = data
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let vector = parse_vector(item, "ollama", i)?;
                Ok(Embedding {
                    dimensions: vector.len(),
                    vector,
                    model: self.model.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(batch_envelope(embeddings, &self.model, "ollama", 0.0, started))
    }

    fn dimensions(&self) -> usize {
        match self.model.as_str() {
            "nomic-embed-text" => EMBEDDING_DIMENSION_OLLAMA_NOMIC,
            "all-minilm" => EMBEDDING_DIMENSION_OLLAMA_MINILM,
            "mxbai-embed-large" => EMBEDDING_DIMENSION_OLLAMA_MXBAI,
            _ => EMBEDDING_DIMENSION_OLLAMA_DEFAULT,
        }
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn cost_per_call(&self) -> f64 {
        0.0
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{EMBEDDING_PROVIDERS, EmbeddingProviderEntry};

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static OLLAMA_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "ollama",
    description: "Ollama local embedding provider (nomic-embed-text, all-minilm, ...)",
    factory: |config| {
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string());
        let timeout = crate::embedding::helpers::DEFAULT_EMBEDDING_TIMEOUT;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config_with_source("failed to build HTTP client", e))?;

        Ok(std::sync::Arc::new(OllamaEmbeddingProvider::new(
            config.base_url.clone(),
            model,
            timeout,
            http_client,
        )))
    },
};
