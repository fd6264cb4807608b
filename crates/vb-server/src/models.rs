//! Request and response models
//!
//! Validated DTOs for the JSON surface. Every synchronous endpoint answers
//! with a `success` envelope; failures carry an `error` string instead of
//! a bare HTTP error, so callers can degrade to non-semantic behavior.

use serde::{Deserialize, Serialize};
use validator::Validate;

use vb_domain::ports::infrastructure::MetricsSnapshot;
use vb_domain::value_objects::SearchMatch;

/// `POST /vectors/store` request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreVectorRequest {
    /// Source-of-record table
    #[validate(length(min = 1, max = 128))]
    pub table_name: String,

    /// Source-of-record row id
    #[validate(length(min = 1, max = 256))]
    pub record_id: String,

    /// Content to embed
    #[validate(length(min = 1))]
    pub content: String,

    /// Projection to embed ("content", "summary", "metadata")
    #[validate(length(min = 1))]
    pub vector_type: String,

    /// Routing preference override ("fast", "balanced", "quality")
    pub preference: Option<String>,
}

/// `POST /vectors/store` response
#[derive(Debug, Clone, Serialize, Default)]
pub struct StoreVectorResponse {
    /// Whether the vector was stored and committed
    pub success: bool,
    /// Vector-index point id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_id: Option<String>,
    /// Adapter that generated the embedding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_used: Option<String>,
    /// End-to-end processing time
    pub processing_time_ms: u64,
    /// Cost of the provider call in USD
    pub cost: f64,
    /// Failure detail when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreVectorResponse {
    /// Failure envelope
    pub fn failure(error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            processing_time_ms,
            ..Default::default()
        }
    }
}

/// `POST /vectors/search` request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchVectorsRequest {
    /// Query text
    #[validate(length(min = 1, max = 4096))]
    pub query_text: String,

    /// Source-of-record table to search
    #[validate(length(min = 1, max = 128))]
    pub table_name: String,

    /// Maximum matches to return
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,

    /// Routing preference override
    pub preference: Option<String>,
}

/// `POST /vectors/search` response
#[derive(Debug, Clone, Serialize, Default)]
pub struct SearchVectorsResponse {
    /// Whether the search executed
    pub success: bool,
    /// Ranked matches, best first
    pub results: Vec<SearchMatch>,
    /// Adapter that embedded the query ("cache" on a result-cache hit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_used: Option<String>,
    /// End-to-end processing time
    pub processing_time_ms: u64,
    /// Failure detail when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchVectorsResponse {
    /// Failure envelope
    pub fn failure(error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            processing_time_ms,
            ..Default::default()
        }
    }
}

/// `GET /performance/metrics` response
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    /// Whether the snapshot was assembled
    pub success: bool,
    /// The metrics snapshot
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

/// One provider endpoint as exposed over the config surface
///
/// API keys never round-trip: reads omit them, writes accept them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProviderEndpointDto {
    /// Registry provider name
    #[validate(length(min = 1, max = 64))]
    pub provider: String,
    /// Model name
    pub model: Option<String>,
    /// API key (write-only; omitted in responses)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Estimated cost of one batch call in USD
    #[serde(default)]
    pub cost_per_call: f64,
    /// Chain position preference
    #[serde(default)]
    pub priority: u32,
    /// Hosted API vs local adapter
    #[serde(default)]
    pub hosted: bool,
    /// Whether the endpoint is routable
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// `GET /config/providers` response
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersConfigResponse {
    /// Whether the configuration was read
    pub success: bool,
    /// Embedding endpoint pool (sanitized)
    pub embedding: Vec<ProviderEndpointDto>,
    /// Vector store backend name
    pub vector_store: String,
    /// Bridge ledger backend name
    pub ledger: String,
}

/// `PUT /config/providers` request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProvidersRequest {
    /// Replacement embedding endpoint pool
    #[validate(length(min = 1), nested)]
    pub embedding: Vec<ProviderEndpointDto>,
}

/// `PUT /config/tenants/<id>/preference` request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TenantPreferenceRequest {
    /// Routing preference ("fast", "balanced", "quality")
    #[validate(length(min = 1, max = 16))]
    pub preference: String,
}

/// Generic mutation acknowledgement
#[derive(Debug, Clone, Serialize, Default)]
pub struct AckResponse {
    /// Whether the mutation was applied
    pub success: bool,
    /// Failure detail when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckResponse {
    /// Success acknowledgement
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Failure acknowledgement
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: &'static str,
    /// Active routing snapshot version
    pub snapshot_version: u64,
    /// Registered embedding providers
    pub embedding_providers: Vec<String>,
}
