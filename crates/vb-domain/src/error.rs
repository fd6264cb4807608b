//! Error handling types
//!
//! The engine-wide error taxonomy. Provider failures carry enough structure
//! for the router to decide between retry, fallback, and propagation.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the vectorbridge engine
#[derive(Error, Debug)]
pub enum Error {
    /// Provider call exceeded its deadline
    #[error("provider '{provider}' timed out after {timeout_ms}ms")]
    ProviderTimeout {
        /// Provider that timed out
        provider: String,
        /// Deadline that was exceeded, in milliseconds
        timeout_ms: u64,
    },

    /// Provider rejected the request (4xx / quota)
    #[error("provider '{provider}' rejected the request (status {status}): {message}")]
    ProviderRejected {
        /// Provider that rejected the request
        provider: String,
        /// HTTP status returned by the provider
        status: u16,
        /// Provider-supplied error detail
        message: String,
    },

    /// Every adapter in the fallback chain failed
    #[error("no provider left for capability '{capability}' after trying: {attempted}")]
    ProviderExhausted {
        /// Capability that could not be served
        capability: String,
        /// Comma-joined list of adapters that were tried
        attempted: String,
    },

    /// Vector size conflict on an existing collection. Fatal: operator-resolved only.
    #[error(
        "collection '{collection}' exists with {actual} dimensions, requested {expected}"
    )]
    CollectionMismatch {
        /// Physical collection name
        collection: String,
        /// Dimensions requested by the caller
        expected: usize,
        /// Dimensions the collection was created with
        actual: usize,
    },

    /// Vector written but ledger commit failed; repaired by reconciliation
    #[error("orphaned point '{point_id}' in collection '{collection}'")]
    LedgerOrphan {
        /// Collection holding the orphaned point
        collection: String,
        /// Point id with no matching ledger row
        point_id: String,
    },

    /// Input rejected before any I/O was performed
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Network-level failure (connect errors, 5xx responses)
    #[error("network error: {message}")]
    Network {
        /// Description of the network failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error; fails fast, never retried
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache operation error
    #[error("cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Vector index operation error
    #[error("vector index error: {message}")]
    VectorDb {
        /// Description of the vector index error
        message: String,
    },

    /// Bridge ledger operation error
    #[error("ledger error: {message}")]
    Ledger {
        /// Description of the ledger error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal invariant violation
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },
}

// Provider error constructors
impl Error {
    /// Create a provider timeout error
    pub fn provider_timeout<S: Into<String>>(provider: S, timeout_ms: u64) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            timeout_ms,
        }
    }

    /// Create a provider rejection error
    pub fn provider_rejected<S: Into<String>, M: Into<String>>(
        provider: S,
        status: u16,
        message: M,
    ) -> Self {
        Self::ProviderRejected {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a chain-exhausted error from the list of adapters tried
    pub fn provider_exhausted<S: Into<String>>(capability: S, attempted: &[String]) -> Self {
        Self::ProviderExhausted {
            capability: capability.into(),
            attempted: attempted.join(", "),
        }
    }
}

// Store error constructors
impl Error {
    /// Create a collection size mismatch error
    pub fn collection_mismatch<S: Into<String>>(
        collection: S,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::CollectionMismatch {
            collection: collection.into(),
            expected,
            actual,
        }
    }

    /// Create a ledger orphan marker error
    pub fn ledger_orphan<C: Into<String>, P: Into<String>>(collection: C, point_id: P) -> Self {
        Self::LedgerOrphan {
            collection: collection.into(),
            point_id: point_id.into(),
        }
    }

    /// Create a vector index error
    pub fn vector_db<S: Into<String>>(message: S) -> Self {
        Self::VectorDb {
            message: message.into(),
        }
    }

    /// Create a ledger error
    pub fn ledger<S: Into<String>>(message: S) -> Self {
        Self::Ledger {
            message: message.into(),
            source: None,
        }
    }

    /// Create a ledger error with source
    pub fn ledger_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Ledger {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Ambient error constructors
impl Error {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl Error {
    /// Whether the router may continue down the fallback chain after this error.
    ///
    /// Timeouts, network failures (connect errors and 5xx), and quota
    /// rejections (429) are transient from the caller's point of view: a
    /// different adapter can still serve the request. Any other rejection
    /// means the payload itself was refused and no adapter will do better.
    pub fn is_fallback_eligible(&self) -> bool {
        match self {
            Self::ProviderTimeout { .. } | Self::Network { .. } => true,
            Self::ProviderRejected { status, .. } => *status == 429,
            _ => false,
        }
    }

    /// Whether this error is fatal and must reach an operator unchanged
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CollectionMismatch { .. } | Self::Config { .. })
    }

    /// Taxonomy kind, used as the metrics error-counter key
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderTimeout { .. } => "provider_timeout",
            Self::ProviderRejected { .. } => "provider_rejected",
            Self::ProviderExhausted { .. } => "provider_exhausted",
            Self::CollectionMismatch { .. } => "collection_mismatch",
            Self::LedgerOrphan { .. } => "ledger_orphan",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Network { .. } => "network",
            Self::Config { .. } => "config",
            Self::Cache { .. } => "cache",
            Self::VectorDb { .. } => "vector_db",
            Self::Ledger { .. } => "ledger",
            Self::Internal { .. } => "internal",
            Self::Io { .. } => "io",
            Self::Json { .. } => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_classification() {
        assert!(Error::provider_timeout("openai", 30_000).is_fallback_eligible());
        assert!(Error::network("connection refused").is_fallback_eligible());
        assert!(Error::provider_rejected("openai", 429, "quota").is_fallback_eligible());
        assert!(!Error::provider_rejected("openai", 400, "bad request").is_fallback_eligible());
        assert!(!Error::invalid_input("empty text").is_fallback_eligible());
    }

    #[test]
    fn fatal_classification() {
        assert!(Error::collection_mismatch("tenant_1_issues", 768, 1536).is_fatal());
        assert!(Error::config("bad provider type").is_fatal());
        assert!(!Error::provider_timeout("ollama", 30_000).is_fatal());
    }

    #[test]
    fn exhausted_lists_attempted_adapters() {
        let err = Error::provider_exhausted(
            "embed",
            &["openai".to_string(), "ollama".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "no provider left for capability 'embed' after trying: openai, ollama"
        );
    }
}
