//! OpenAI embedding provider
//!
//! Implements the `EmbeddingProvider` port over OpenAI's embeddings API.
//! Supports text-embedding-3-small, text-embedding-3-large, and ada-002.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::EmbeddingProvider;
use vb_domain::value_objects::{Embedding, EmbeddingBatch};

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_OPENAI_ADA, EMBEDDING_DIMENSION_OPENAI_LARGE,
    EMBEDDING_DIMENSION_OPENAI_SMALL, OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL,
};
use crate::embedding::helpers::{batch_envelope, constructor, parse_vector};
use crate::utils::http_response::{check_and_parse, map_transport_error};

/// OpenAI embedding provider
///
/// The highest-fidelity hosted adapter; "quality" routing prefers it.
/// Receives its HTTP client via constructor injection.
pub struct OpenAiEmbeddingProvider {
    api_key: String,
    base_url: String,
    model: String,
    cost_per_call: f64,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiEmbeddingProvider {
    /// Create a new OpenAI embedding provider
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        cost_per_call: f64,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            api_key: constructor::validate_api_key(&api_key),
            base_url: constructor::effective_url(base_url.as_deref(), OPENAI_DEFAULT_BASE_URL),
            model,
            cost_per_call,
            timeout,
            http_client,
        }
    }

    /// Model name served by this adapter
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn fetch_embeddings(&self, texts: &[String]) -> Result<serde_json::Value> {
        let payload = serde_json::json!({
            "input": texts,
            "model": self.model,
            "encoding_format": "float"
        });

        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "openai", self.timeout.as_millis() as u64))?;

        check_and_parse(response, "openai").await
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        if texts.is_empty() {
            return Err(Error::invalid_input("cannot embed an empty batch"));
        }

        let started = Instant::now();
        let response = self.fetch_embeddings(texts).await?;

        let data = response["data"]
            .as_array()
            .ok_or_else(|| Error::network("openai response missing data array"))?;
        if data.len() != texts.len() {
            return Err(Error::network(format!(
                "openai returned {} embeddings for {} inputs",
                data.len(),
                texts.len()
            )));
        }

        let embeddings = data
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let vector = parse_vector(&item["embedding"], "openai", i)?;
                Ok(Embedding {
                    dimensions: vector.len(),
                    vector,
                    model: self.model.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(batch_envelope(
            embeddings,
            &self.model,
            "openai",
            self.cost_per_call,
            started,
        ))
    }

    fn dimensions(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-small" => EMBEDDING_DIMENSION_OPENAI_SMALL,
            "text-embedding-3-large" => EMBEDDING_DIMENSION_OPENAI_LARGE,
            "text-embedding-ada-002" => EMBEDDING_DIMENSION_OPENAI_ADA,
            _ => EMBEDDING_DIMENSION_OPENAI_SMALL,
        }
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn cost_per_call(&self) -> f64 {
        self.cost_per_call
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{EMBEDDING_PROVIDERS, EmbeddingProviderEntry};

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static OPENAI_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "openai",
    description: "OpenAI embedding provider (text-embedding-3-small/large, ada-002)",
    factory: |config| {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("openai requires api_key"))?;
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string());
        let timeout = crate::embedding::helpers::DEFAULT_EMBEDDING_TIMEOUT;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config_with_source("failed to build HTTP client", e))?;

        Ok(std::sync::Arc::new(OpenAiEmbeddingProvider::new(
            api_key,
            config.base_url.clone(),
            model,
            config.cost_per_call.unwrap_or(0.0001),
            timeout,
            http_client,
        )))
    },
};
