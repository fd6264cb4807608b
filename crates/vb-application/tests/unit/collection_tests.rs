//! Collection manager idempotence and mismatch tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use vb_application::services::CollectionManager;
use vb_domain::error::Result;
use vb_domain::ports::providers::{PayloadFilter, ScoredPoint, VectorPoint, VectorStoreProvider};
use vb_domain::value_objects::{CollectionSpec, DistanceMetric};
use vb_providers::vector_store::InMemoryVectorStore;

/// Store decorator counting physical collection creations
struct CountingStore {
    inner: InMemoryVectorStore,
    creates: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryVectorStore::new(),
            creates: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VectorStoreProvider for CountingStore {
    async fn create_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: DistanceMetric,
    ) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_collection(name, dimensions, distance).await
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        self.inner.collection_exists(name).await
    }

    async fn collection_dimensions(&self, name: &str) -> Result<Option<usize>> {
        self.inner.collection_dimensions(name).await
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: &[VectorPoint],
    ) -> Result<Vec<String>> {
        self.inner.upsert_points(collection, points).await
    }

    async fn search_points(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
        filter: &PayloadFilter,
    ) -> Result<Vec<ScoredPoint>> {
        self.inner
            .search_points(collection, query_vector, limit, filter)
            .await
    }

    async fn delete_points(&self, collection: &str, ids: &[String]) -> Result<()> {
        self.inner.delete_points(collection, ids).await
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.inner.delete_collection(name).await
    }

    async fn list_point_ids(&self, collection: &str) -> Result<Vec<String>> {
        self.inner.list_point_ids(collection).await
    }

    fn provider_name(&self) -> &str {
        "counting"
    }
}

#[tokio::test]
async fn concurrent_ensure_yields_exactly_one_collection() {
    let store = Arc::new(CountingStore::new());
    let manager = Arc::new(CollectionManager::new(store.clone()));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let manager = Arc::clone(&manager);
        tasks.spawn(async move {
            manager
                .ensure_collection(&CollectionSpec::new(1, "issues", 8))
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let name = joined.unwrap().expect("no ensure call may error");
        assert_eq!(name, "tenant_1_issues");
    }

    assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    assert!(store.collection_exists("tenant_1_issues").await.unwrap());
}

#[tokio::test]
async fn repeated_ensure_is_a_no_op() {
    let store = Arc::new(CountingStore::new());
    let manager = CollectionManager::new(store.clone());
    let spec = CollectionSpec::new(1, "issues", 8);

    manager.ensure_collection(&spec).await.unwrap();
    manager.ensure_collection(&spec).await.unwrap();
    manager.ensure_collection(&spec).await.unwrap();

    assert_eq!(store.creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dimension_mismatch_is_fatal_and_never_silently_resolved() {
    let manager = CollectionManager::new(Arc::new(InMemoryVectorStore::new()));

    manager
        .ensure_collection(&CollectionSpec::new(1, "issues", 768))
        .await
        .unwrap();
    let err = manager
        .ensure_collection(&CollectionSpec::new(1, "issues", 1536))
        .await
        .expect_err("size conflict must fail");

    assert!(err.is_fatal());
    assert!(err.to_string().contains("768"));

    // The original collection is untouched
    assert!(
        manager
            .ensure_collection(&CollectionSpec::new(1, "issues", 768))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn mismatch_detected_against_collections_created_elsewhere() {
    let store = Arc::new(InMemoryVectorStore::new());
    store
        .create_collection("tenant_1_issues", 768, DistanceMetric::Cosine)
        .await
        .unwrap();

    // A fresh manager (no cached knowledge) still detects the conflict
    let manager = CollectionManager::new(store);
    let err = manager
        .ensure_collection(&CollectionSpec::new(1, "issues", 384))
        .await
        .expect_err("must detect existing dimensions");
    assert!(err.is_fatal());
}
