//! Vector index port
//!
//! Contract for the external vector similarity index. Collections are
//! created with fixed dimensions and metric; every write and search carries
//! a mandatory tenant filter in the payload as defense-in-depth against a
//! misconfigured or guessed collection name.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::value_objects::{DistanceMetric, TenantId, VectorType};

/// One point to upsert: id, vector, and payload
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPoint {
    /// Point id (stable across upserts of the same ledger row)
    pub id: String,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Payload stored alongside the vector
    pub payload: HashMap<String, Value>,
}

/// One ranked point returned by a search
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    /// Point id
    pub id: String,
    /// Similarity score (0.0 to 1.0, higher is better)
    pub score: f64,
    /// Payload stored alongside the vector
    pub payload: HashMap<String, Value>,
}

/// Mandatory search/write scope
///
/// The tenant id is not optional: a filter without it cannot be
/// constructed, which is the point. The projection filter is optional and
/// narrows a search to one vector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadFilter {
    /// Tenant every returned point must belong to
    pub tenant_id: TenantId,
    /// Restrict matches to one projection, if set
    pub vector_type: Option<VectorType>,
}

impl PayloadFilter {
    /// Scope to one tenant
    pub fn tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            vector_type: None,
        }
    }

    /// Additionally scope to one projection
    pub fn with_vector_type(mut self, vector_type: VectorType) -> Self {
        self.vector_type = Some(vector_type);
        self
    }
}

/// Vector similarity index provider
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Create a collection with fixed dimensions and metric
    ///
    /// Errors if the collection already exists; callers wanting idempotence
    /// go through the collection manager, which also enforces the
    /// dimension-mismatch check.
    async fn create_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: DistanceMetric,
    ) -> Result<()>;

    /// Whether a collection exists
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Dimensions a collection was created with, `None` if it doesn't exist
    async fn collection_dimensions(&self, name: &str) -> Result<Option<usize>>;

    /// Upsert points; returns the point ids in input order
    async fn upsert_points(&self, collection: &str, points: &[VectorPoint])
        -> Result<Vec<String>>;

    /// Search for the `limit` nearest points under the mandatory filter
    async fn search_points(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
        filter: &PayloadFilter,
    ) -> Result<Vec<ScoredPoint>>;

    /// Delete points by id
    async fn delete_points(&self, collection: &str, ids: &[String]) -> Result<()>;

    /// Delete a collection and everything in it
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// All point ids in a collection (reconciliation scan)
    async fn list_point_ids(&self, collection: &str) -> Result<Vec<String>>;

    /// Identifier of this provider (e.g. "memory", "null")
    fn provider_name(&self) -> &str;

    /// Health check (default: probe collection existence)
    async fn health_check(&self) -> Result<()> {
        self.collection_exists("__health_check__").await?;
        Ok(())
    }
}
