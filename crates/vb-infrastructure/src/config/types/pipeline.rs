//! Pipeline configuration types

use serde::{Deserialize, Serialize};

use vb_domain::constants::{
    COMPLEXITY_SIMPLE_THRESHOLD, DEFAULT_INGEST_CONCURRENCY, DEFAULT_QUERY_CONCURRENCY,
    INGEST_BATCH_MAX, INGEST_BATCH_MIN,
};

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionSettings {
    /// Smallest batch the partitioner produces (except the tail)
    pub batch_min: usize,

    /// Largest batch the partitioner produces
    pub batch_max: usize,

    /// Concurrent batches in flight across all jobs
    pub concurrency: usize,

    /// Buffered records that trigger a flush into a job
    pub flush_max_pending: usize,

    /// Seconds after which buffered records flush regardless of count
    pub flush_max_wait_secs: u64,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            batch_min: INGEST_BATCH_MIN,
            batch_max: INGEST_BATCH_MAX,
            concurrency: DEFAULT_INGEST_CONCURRENCY,
            flush_max_pending: INGEST_BATCH_MIN,
            flush_max_wait_secs: 30,
        }
    }
}

/// Interactive query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Concurrent interactive queries in flight
    pub concurrency: usize,

    /// Complexity score below which a query takes the single-pass path
    pub simple_threshold: f64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_QUERY_CONCURRENCY,
            simple_threshold: COMPLEXITY_SIMPLE_THRESHOLD,
        }
    }
}

/// Reconciliation cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationSettings {
    /// Never reconcile more often than this many seconds
    pub min_interval_secs: u64,

    /// Always reconcile once this many seconds have passed
    pub max_interval_secs: u64,

    /// Ingested-record count that justifies an early pass
    pub record_threshold: u64,
}

impl Default for ReconciliationSettings {
    fn default() -> Self {
        Self {
            min_interval_secs: 60,
            max_interval_secs: 15 * 60,
            record_threshold: 1_000,
        }
    }
}
