//! Provider and routing configuration types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vb_domain::constants::{
    DEFAULT_BALANCED_BATCH_THRESHOLD, PROVIDER_CALL_TIMEOUT_SECS, RETRY_BASE_BACKOFF_MS,
    RETRY_JITTER_MS,
};

/// One embedding endpoint in the routing pool
///
/// The list order is not significant; `priority` orders the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingEndpointSettings {
    /// Registry provider name ("openai", "gemini", "ollama", "null")
    pub provider: String,

    /// Model name, provider default when unset
    pub model: Option<String>,

    /// API key for hosted providers
    pub api_key: Option<String>,

    /// Base URL override
    pub base_url: Option<String>,

    /// Vector dimensions, provider default when unset
    pub dimensions: Option<usize>,

    /// Estimated cost of one batch call in USD
    #[serde(default)]
    pub cost_per_call: f64,

    /// Chain position preference; lower is tried first within a class
    #[serde(default)]
    pub priority: u32,

    /// Hosted API (true) vs local adapter (false)
    #[serde(default)]
    pub hosted: bool,

    /// Inactive endpoints stay configured but are never routed to
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Vector index backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreSettings {
    /// Registry provider name ("memory", "null")
    pub provider: String,

    /// Endpoint URL for remote backends
    pub url: Option<String>,

    /// API key for remote backends
    pub api_key: Option<String>,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "memory".to_string(),
            url: None,
            api_key: None,
        }
    }
}

/// Bridge ledger backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Registry backend name ("memory", "null")
    pub provider: String,

    /// Connection string for relational backends
    pub connection: Option<String>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            provider: "memory".to_string(),
            connection: None,
        }
    }
}

/// Backend providers section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersSettings {
    /// Embedding endpoint pool
    pub embedding: Vec<EmbeddingEndpointSettings>,

    /// Vector index backend
    #[serde(default)]
    pub vector_store: VectorStoreSettings,

    /// Bridge ledger backend
    #[serde(default)]
    pub ledger: LedgerSettings,
}

impl Default for ProvidersSettings {
    fn default() -> Self {
        Self {
            embedding: vec![EmbeddingEndpointSettings {
                provider: "null".to_string(),
                model: None,
                api_key: None,
                base_url: None,
                dimensions: None,
                cost_per_call: 0.0,
                priority: 0,
                hosted: false,
                active: true,
            }],
            vector_store: VectorStoreSettings::default(),
            ledger: LedgerSettings::default(),
        }
    }
}

/// Router policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Batch size at which "balanced" switches to the cheapest adapter
    pub balanced_batch_threshold: usize,

    /// Deadline for one provider call, in seconds
    pub call_timeout_secs: u64,

    /// Backoff before the single in-adapter retry, in milliseconds
    pub base_backoff_ms: u64,

    /// Upper bound of the retry jitter, in milliseconds
    pub max_jitter_ms: u64,

    /// Per-tenant preference overrides, keyed by tenant id
    #[serde(default)]
    pub tenant_preferences: HashMap<String, String>,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            balanced_batch_threshold: DEFAULT_BALANCED_BATCH_THRESHOLD,
            call_timeout_secs: PROVIDER_CALL_TIMEOUT_SECS,
            base_backoff_ms: RETRY_BASE_BACKOFF_MS,
            max_jitter_ms: RETRY_JITTER_MS,
            tenant_preferences: HashMap::new(),
        }
    }
}
