//! Collection specification
//!
//! A collection is the tenant+table-scoped namespace in the vector index.
//! Vector size and distance metric are fixed at creation; re-creating with
//! a different size is a fatal configuration error, never silently fixed.

use serde::{Deserialize, Serialize};

use super::TenantId;
use crate::constants::COLLECTION_NAME_PREFIX;

/// Distance metric used for similarity ranking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine similarity (default)
    #[default]
    Cosine,
    /// Euclidean distance
    Euclid,
    /// Dot product
    Dot,
}

/// Logical description of a tenant+table collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Source-of-record table
    pub source_table: String,
    /// Fixed vector dimensionality
    pub vector_size: usize,
    /// Fixed distance metric
    pub distance: DistanceMetric,
}

impl CollectionSpec {
    /// Create a collection spec with the default metric
    pub fn new<T: Into<String>>(tenant_id: TenantId, source_table: T, vector_size: usize) -> Self {
        Self {
            tenant_id,
            source_table: source_table.into(),
            vector_size,
            distance: DistanceMetric::default(),
        }
    }

    /// Physical collection name: `tenant_{id}_{table}`
    pub fn physical_name(&self) -> String {
        format!(
            "{}_{}_{}",
            COLLECTION_NAME_PREFIX, self.tenant_id, self.source_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_name_is_tenant_scoped() {
        let spec = CollectionSpec::new(1, "issues", 768);
        assert_eq!(spec.physical_name(), "tenant_1_issues");
    }
}
