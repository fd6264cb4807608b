//! Null vector store
//!
//! Accepts every write and returns no matches. Useful when the engine
//! runs with vectorization disabled.

use async_trait::async_trait;

use vb_domain::error::Result;
use vb_domain::ports::providers::{PayloadFilter, ScoredPoint, VectorPoint, VectorStoreProvider};
use vb_domain::value_objects::DistanceMetric;

/// Null vector store provider
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVectorStore;

impl NullVectorStore {
    /// Create a null store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VectorStoreProvider for NullVectorStore {
    async fn create_collection(
        &self,
        _name: &str,
        _dimensions: usize,
        _distance: DistanceMetric,
    ) -> Result<()> {
        Ok(())
    }

    async fn collection_exists(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }

    async fn collection_dimensions(&self, _name: &str) -> Result<Option<usize>> {
        Ok(None)
    }

    async fn upsert_points(
        &self,
        _collection: &str,
        points: &[VectorPoint],
    ) -> Result<Vec<String>> {
        Ok(points.iter().map(|p| p.id.clone()).collect())
    }

    async fn search_points(
        &self,
        _collection: &str,
        _query_vector: &[f32],
        _limit: usize,
        _filter: &PayloadFilter,
    ) -> Result<Vec<ScoredPoint>> {
        Ok(Vec::new())
    }

    async fn delete_points(&self, _collection: &str, _ids: &[String]) -> Result<()> {
        Ok(())
    }

    async fn delete_collection(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn list_point_ids(&self, _collection: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn provider_name(&self) -> &str {
        "null"
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{VECTOR_STORE_PROVIDERS, VectorStoreProviderEntry};

#[linkme::distributed_slice(VECTOR_STORE_PROVIDERS)]
static NULL_PROVIDER: VectorStoreProviderEntry = VectorStoreProviderEntry {
    name: "null",
    description: "No-op vector store (vectorization disabled)",
    factory: |_settings| Ok(std::sync::Arc::new(NullVectorStore::new())),
};
