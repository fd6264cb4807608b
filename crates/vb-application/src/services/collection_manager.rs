//! Vector collection manager
//!
//! Idempotent, concurrency-safe access to tenant+table-scoped collections.
//! `ensure_collection` is safe under concurrent callers for the same key:
//! the second caller observes the first's result, never a duplicate or an
//! error. A dimension conflict with an existing collection is fatal and is
//! never silently resolved.
//!
//! Every write and search goes through here so the mandatory tenant
//! payload filter cannot be forgotten, even when a caller holds a
//! misconfigured or guessed collection name.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use vb_domain::constants::{METADATA_CALL_TIMEOUT_SECS, PAYLOAD_KEY_TENANT};
use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::{PayloadFilter, ScoredPoint, VectorPoint, VectorStoreProvider};
use vb_domain::value_objects::{CollectionSpec, TenantId, VectorType};

/// Manager over the vector index port
pub struct CollectionManager {
    store: Arc<dyn VectorStoreProvider>,
    // One async mutex per physical name serializes concurrent ensures
    ensure_locks: DashMap<String, Arc<Mutex<()>>>,
    // Physical name -> dimensions, filled on first ensure
    known: DashMap<String, usize>,
    admin_timeout: Duration,
}

impl CollectionManager {
    /// Create a manager over a vector store
    pub fn new(store: Arc<dyn VectorStoreProvider>) -> Self {
        Self {
            store,
            ensure_locks: DashMap::new(),
            known: DashMap::new(),
            admin_timeout: Duration::from_secs(METADATA_CALL_TIMEOUT_SECS),
        }
    }

    /// Idempotently ensure a collection exists; returns its physical name
    ///
    /// Existing collection with matching dimensions: no-op. Existing with
    /// different dimensions: `CollectionMismatch`, operator-resolved only.
    /// Missing: created with the spec's size and metric.
    pub async fn ensure_collection(&self, spec: &CollectionSpec) -> Result<String> {
        let name = spec.physical_name();

        if let Some(dims) = self.known.get(&name) {
            return if *dims == spec.vector_size {
                Ok(name)
            } else {
                Err(Error::collection_mismatch(&name, spec.vector_size, *dims))
            };
        }

        let lock = self
            .ensure_locks
            .entry(name.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Re-check under the lock: a concurrent caller may have finished
        let existing = self
            .admin_call(self.store.collection_dimensions(&name))
            .await?;
        match existing {
            Some(dims) if dims == spec.vector_size => {
                self.known.insert(name.clone(), dims);
                Ok(name)
            }
            Some(dims) => Err(Error::collection_mismatch(&name, spec.vector_size, dims)),
            None => {
                self.admin_call(self.store.create_collection(
                    &name,
                    spec.vector_size,
                    spec.distance,
                ))
                .await?;
                self.known.insert(name.clone(), spec.vector_size);
                info!(
                    collection = %name,
                    dimensions = spec.vector_size,
                    "collection created"
                );
                Ok(name)
            }
        }
    }

    /// Upsert points with the tenant stamped into every payload
    ///
    /// The tenant payload key is written here unconditionally, overriding
    /// whatever the caller put in it.
    pub async fn upsert(
        &self,
        collection: &str,
        tenant_id: TenantId,
        mut points: Vec<VectorPoint>,
    ) -> Result<Vec<String>> {
        for point in &mut points {
            point
                .payload
                .insert(PAYLOAD_KEY_TENANT.to_string(), json!(tenant_id));
        }
        self.store.upsert_points(collection, &points).await
    }

    /// Search under the mandatory tenant filter
    ///
    /// `vector_type` narrows the search to one projection; `None` ranks
    /// across all projections in the collection.
    pub async fn search(
        &self,
        collection: &str,
        tenant_id: TenantId,
        query_vector: &[f32],
        limit: usize,
        vector_type: Option<VectorType>,
    ) -> Result<Vec<ScoredPoint>> {
        let mut filter = PayloadFilter::tenant(tenant_id);
        if let Some(vt) = vector_type {
            filter = filter.with_vector_type(vt);
        }
        self.store
            .search_points(collection, query_vector, limit, &filter)
            .await
    }

    /// Delete points by id
    pub async fn delete_points(&self, collection: &str, ids: &[String]) -> Result<()> {
        debug!(collection, count = ids.len(), "deleting points");
        self.store.delete_points(collection, ids).await
    }

    /// All point ids in a collection (reconciliation scan)
    pub async fn list_point_ids(&self, collection: &str) -> Result<Vec<String>> {
        self.store.list_point_ids(collection).await
    }

    /// Whether a collection exists in the index
    pub async fn collection_exists(&self, name: &str) -> Result<bool> {
        self.admin_call(self.store.collection_exists(name)).await
    }

    /// Collections this process has ensured so far
    ///
    /// The reconciliation orchestrator scans these; collections created by
    /// other processes are covered by their own orchestrators.
    pub fn known_collections(&self) -> Vec<String> {
        self.known.iter().map(|entry| entry.key().clone()).collect()
    }

    async fn admin_call<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.admin_timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(Error::vector_db(format!(
                    "index admin call timed out after {}s",
                    self.admin_timeout.as_secs()
                )))
            })
    }
}
