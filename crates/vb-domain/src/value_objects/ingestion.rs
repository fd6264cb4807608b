//! Ingestion job value objects
//!
//! Jobs are ephemeral: progress counters are observable while the job runs
//! but are never durably persisted.

use serde::{Deserialize, Serialize};

use super::record::{SourceRecord, VectorType};
use super::routing::RoutePreference;
use super::TenantId;

/// One batch-vectorization job handed to the ingestion pipeline
#[derive(Debug, Clone)]
pub struct IngestionJob {
    /// Job identifier (for logging and progress polling)
    pub job_id: String,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Source-of-record table the records came from
    pub source_table: String,
    /// Records to vectorize
    pub records: Vec<SourceRecord>,
    /// Projection to embed
    pub vector_type: VectorType,
    /// Routing preference for the job's provider calls
    pub preference: RoutePreference,
}

impl IngestionJob {
    /// Create a job with a fresh id
    pub fn new<T: Into<String>>(
        tenant_id: TenantId,
        source_table: T,
        records: Vec<SourceRecord>,
        vector_type: VectorType,
        preference: RoutePreference,
    ) -> Self {
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            tenant_id,
            source_table: source_table.into(),
            records,
            vector_type,
            preference,
        }
    }
}

/// Point-in-time view of a running job's monotonic counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    /// Records in the job
    pub total: u64,
    /// Records whose processing finished (success or failure)
    pub processed: u64,
    /// Records fully committed (vector + ledger row)
    pub succeeded: u64,
    /// Records that failed and were excluded from the success count
    pub failed: u64,
    /// Seconds the job has been running
    pub elapsed_secs: u64,
    /// Throughput-derived estimate of seconds remaining, if computable
    pub eta_secs: Option<u64>,
}

impl ProgressSnapshot {
    /// Whether every record has been processed
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}
