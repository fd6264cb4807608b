//! Engine-wide constants
//!
//! Default values for timeouts, batching, caching, and routing. Anything a
//! deployment is expected to tune also has a configuration knob in
//! `vb-infrastructure`; the constants here are the fallback defaults.

/// Timeout for provider embed/generation calls, in seconds
pub const PROVIDER_CALL_TIMEOUT_SECS: u64 = 30;

/// Timeout for cache and index metadata calls, in seconds
pub const METADATA_CALL_TIMEOUT_SECS: u64 = 5;

/// Smallest batch the ingestion partitioner will produce (except the tail)
pub const INGEST_BATCH_MIN: usize = 100;

/// Largest batch the ingestion partitioner will produce
pub const INGEST_BATCH_MAX: usize = 200;

/// Concurrent ingestion batches in flight
pub const DEFAULT_INGEST_CONCURRENCY: usize = 4;

/// Concurrent interactive queries in flight
pub const DEFAULT_QUERY_CONCURRENCY: usize = 16;

/// Complexity score below which a query takes the single-pass path
pub const COMPLEXITY_SIMPLE_THRESHOLD: f64 = 0.3;

/// Embedding cache TTL, in seconds (~24h)
pub const EMBEDDING_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Context cache TTL, in seconds (~2h)
pub const CONTEXT_CACHE_TTL_SECS: u64 = 2 * 60 * 60;

/// Result cache TTL, in seconds (~1h)
pub const RESULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Default per-tier cache capacity (entries)
pub const CACHE_DEFAULT_CAPACITY: usize = 10_000;

/// Batch size above which "balanced" routing picks the cheapest adapter
pub const DEFAULT_BALANCED_BATCH_THRESHOLD: usize = 50;

/// Base backoff before the single in-adapter retry, in milliseconds
pub const RETRY_BASE_BACKOFF_MS: u64 = 250;

/// Upper bound of the random jitter added to the retry backoff, in milliseconds
pub const RETRY_JITTER_MS: u64 = 100;

/// Characters of source content kept in the vector payload preview
pub const PAYLOAD_PREVIEW_MAX_CHARS: usize = 160;

/// Prefix of physical collection names (`tenant_{id}_{table}`)
pub const COLLECTION_NAME_PREFIX: &str = "tenant";

/// Payload key carrying the tenant id on every point
pub const PAYLOAD_KEY_TENANT: &str = "tenant_id";

/// Payload key carrying the source record id on every point
pub const PAYLOAD_KEY_RECORD: &str = "record_id";

/// Payload key carrying the vector type on every point
pub const PAYLOAD_KEY_VECTOR_TYPE: &str = "vector_type";

/// Payload key carrying the content preview on every point
pub const PAYLOAD_KEY_PREVIEW: &str = "content_preview";
