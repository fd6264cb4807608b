//! Bridge ledger value objects
//!
//! The bridge ledger is the durable link between a source-of-record row and
//! a vector-index point. Every point has exactly one active ledger row and
//! vice versa; the write ordering (vector upsert happens-before ledger
//! commit) plus the reconciliation pass enforce the no-orphan invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::VectorType;
use super::TenantId;

/// Logical key of a bridge ledger row
///
/// Unique among active rows: one record projection maps to at most one
/// live vector at any time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BridgeKey {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Source-of-record table
    pub source_table: String,
    /// Source-of-record row id
    pub source_record_id: String,
    /// Which projection of the record this vector represents
    pub vector_type: VectorType,
}

impl BridgeKey {
    /// Create a bridge key
    pub fn new<T: Into<String>, R: Into<String>>(
        tenant_id: TenantId,
        source_table: T,
        source_record_id: R,
        vector_type: VectorType,
    ) -> Self {
        Self {
            tenant_id,
            source_table: source_table.into(),
            source_record_id: source_record_id.into(),
            vector_type,
        }
    }
}

/// Durable row linking a relational record to a vector-index point
///
/// Immutable once committed, except for the `superseded_at` marker set when
/// the content changes or the embedding model is upgraded. The replaced
/// point is deleted only after the replacing row commits, so a record never
/// has zero valid vectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeRecord {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Source-of-record table
    pub source_table: String,
    /// Source-of-record row id
    pub source_record_id: String,
    /// Physical collection holding the point
    pub collection_name: String,
    /// Vector-index point id
    pub point_id: String,
    /// Which projection of the record this vector represents
    pub vector_type: VectorType,
    /// Model that generated the embedding
    pub embedding_model: String,
    /// Adapter that generated the embedding
    pub embedding_provider: String,
    /// When the row was committed
    pub created_at: DateTime<Utc>,
    /// Set when a newer row replaced this one
    pub superseded_at: Option<DateTime<Utc>>,
}

impl BridgeRecord {
    /// Logical key of this row
    pub fn key(&self) -> BridgeKey {
        BridgeKey {
            tenant_id: self.tenant_id,
            source_table: self.source_table.clone(),
            source_record_id: self.source_record_id.clone(),
            vector_type: self.vector_type,
        }
    }

    /// Whether this row is the live mapping for its key
    pub fn is_active(&self) -> bool {
        self.superseded_at.is_none()
    }
}
