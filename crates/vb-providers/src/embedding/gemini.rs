//! Gemini embedding provider
//!
//! Implements the `EmbeddingProvider` port over Google's Gemini embedding
//! API using the batchEmbedContents endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::EmbeddingProvider;
use vb_domain::value_objects::{Embedding, EmbeddingBatch};

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_GEMINI, GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL,
};
use crate::embedding::helpers::{batch_envelope, constructor, parse_vector};
use crate::utils::http_response::{check_and_parse, map_transport_error};

/// Gemini embedding provider
pub struct GeminiEmbeddingProvider {
    api_key: String,
    base_url: String,
    model: String,
    cost_per_call: f64,
    timeout: Duration,
    http_client: Client,
}

impl GeminiEmbeddingProvider {
    /// Create a new Gemini embedding provider
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
            base_url: constructor::effective_url(base_url.as_deref(), GEMINI_DEFAULT_BASE_URL),
            model,
            cost_per_call,
            timeout,
            http_client,
        }
    }

    async fn fetch_embeddings(&self, texts: &[String]) -> Result<serde_json::Value> {
        let requests: Vec<serde_json::Value> = texts
            .iter()
            .map(|text| {
                serde_json::json!({
                    "model": format!("models/{}", self.model),
                    "content": { "parts": [{ "text": text }] }
                })
            })
            .collect();
        let payload = serde_json::json!({ "requests": requests });

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:batchEmbedContents?key={}",
                self.base_url, self.model, self.api_key
            ))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "gemini", self.timeout.as_millis() as u64))?;

        check_and_parse(response, "gemini").await
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        if texts.is_empty() {
            return Err(Error::invalid_input("cannot embed an empty batch"));
        }

        let started = Instant::now();
        let response = self.fetch_embeddings(texts).await?;

        let data = response["embeddings"]
            .as_array()
            .ok_or_else(|| Error::network("gemini response missing embeddings array"))?;
        if data.len() != texts.len() {
            return Err(Error::network(format!(
                "gemini returned {} embeddings for {} inputs",
                data.len(),
                texts.len()
            )));
        }

        let embeddings = data
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let vector = parse_vector(&item["values"], "gemini", i)?;
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
            "gemini",
            self.cost_per_call,
            started,
        ))
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSION_GEMINI
    }

    fn provider_name(&self) -> &str {
        "gemini"
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
static GEMINI_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "gemini",
    description: "Google Gemini embedding provider (text-embedding-004)",
    factory: |config| {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("gemini requires api_key"))?;
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string());
        let timeout = crate::embedding::helpers::DEFAULT_EMBEDDING_TIMEOUT;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config_with_source("failed to build HTTP client", e))?;

        Ok(std::sync::Arc::new(GeminiEmbeddingProvider::new(
            api_key,
            config.base_url.clone(),
            model,
            config.cost_per_call.unwrap_or(0.00005),
            timeout,
            http_client,
        )))
    },
};
