//! In-memory vector store
//!
//! Concurrent in-memory vector index for development and testing. Data is
//! not persisted and is lost on restart. The mandatory payload filter is
//! enforced here at the store level: a point whose payload tenant differs
//! from the filter is invisible to the search no matter which collection
//! name the caller guessed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;

use vb_domain::constants::{PAYLOAD_KEY_TENANT, PAYLOAD_KEY_VECTOR_TYPE};
use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::{PayloadFilter, ScoredPoint, VectorPoint, VectorStoreProvider};
use vb_domain::value_objects::DistanceMetric;

struct CollectionData {
    dimensions: usize,
    distance: DistanceMetric,
    points: Vec<VectorPoint>,
}

/// In-memory vector store provider
pub struct InMemoryVectorStore {
    collections: DashMap<String, CollectionData>,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: DistanceMetric,
    ) -> Result<()> {
        if self.collections.contains_key(name) {
            return Err(Error::vector_db(format!(
                "collection '{name}' already exists"
            )));
        }
        self.collections.insert(
            name.to_string(),
            CollectionData {
                dimensions,
                distance,
                points: Vec::new(),
            },
        );
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        Ok(self.collections.contains_key(name))
    }

    async fn collection_dimensions(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.collections.get(name).map(|c| c.dimensions))
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: &[VectorPoint],
    ) -> Result<Vec<String>> {
        let mut coll = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::vector_db(format!("collection '{collection}' not found")))?;

        for point in points {
            if point.vector.len() != coll.dimensions {
                return Err(Error::vector_db(format!(
                    "point '{}' has {} dimensions, collection '{collection}' expects {}",
                    point.id,
                    point.vector.len(),
                    coll.dimensions
                )));
            }
        }

        let mut ids = Vec::with_capacity(points.len());
        for point in points {
            if let Some(existing) = coll.points.iter_mut().find(|p| p.id == point.id) {
                *existing = point.clone();
            } else {
                coll.points.push(point.clone());
            }
            ids.push(point.id.clone());
        }
        Ok(ids)
    }

    async fn search_points(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
        filter: &PayloadFilter,
    ) -> Result<Vec<ScoredPoint>> {
        // Missing collections return no matches; callers degrade to
        // non-semantic filtering
        let Some(coll) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let query_norm = norm(query_vector);
        let mut heap: BinaryHeap<ScoredEntry> = BinaryHeap::with_capacity(limit + 1);

        for (index, point) in coll.points.iter().enumerate() {
            if !matches_filter(point, filter) {
                continue;
            }
            let score = match coll.distance {
                DistanceMetric::Cosine => cosine_with_norm(query_vector, &point.vector, query_norm),
                DistanceMetric::Dot => dot(query_vector, &point.vector),
                DistanceMetric::Euclid => -euclid(query_vector, &point.vector),
            };

            if heap.len() < limit {
                heap.push(ScoredEntry { score, index });
            } else if let Some(min) = heap.peek() {
                if score > min.score {
                    heap.pop();
                    heap.push(ScoredEntry { score, index });
                }
            }
        }

        let mut entries: Vec<ScoredEntry> = heap.into_iter().collect();
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        Ok(entries
            .into_iter()
            .map(|entry| {
                let point = &coll.points[entry.index];
                ScoredPoint {
                    id: point.id.clone(),
                    score: f64::from(entry.score),
                    payload: point.payload.clone(),
                }
            })
            .collect())
    }

    async fn delete_points(&self, collection: &str, ids: &[String]) -> Result<()> {
        let mut coll = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::vector_db(format!("collection '{collection}' not found")))?;
        coll.points.retain(|p| !ids.contains(&p.id));
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.collections.remove(name);
        Ok(())
    }

    async fn list_point_ids(&self, collection: &str) -> Result<Vec<String>> {
        let coll = self
            .collections
            .get(collection)
            .ok_or_else(|| Error::vector_db(format!("collection '{collection}' not found")))?;
        Ok(coll.points.iter().map(|p| p.id.clone()).collect())
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

fn matches_filter(point: &VectorPoint, filter: &PayloadFilter) -> bool {
    let tenant_matches = point.payload.get(PAYLOAD_KEY_TENANT) == Some(&json!(filter.tenant_id));
    let type_matches = match filter.vector_type {
        Some(vt) => {
            point.payload.get(PAYLOAD_KEY_VECTOR_TYPE) == Some(&json!(vt.as_str()))
        }
        None => true,
    };
    tenant_matches && type_matches
}

/// Heap entry with reverse ordering, so the binary heap acts as a min-heap
#[derive(PartialEq)]
struct ScoredEntry {
    score: f32,
    index: usize,
}

impl Eq for ScoredEntry {}

impl Ord for ScoredEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ScoredEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn euclid(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Cosine similarity normalized into [0, 1]
fn cosine_with_norm(a: &[f32], b: &[f32], norm_a: f32) -> f32 {
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot(a, b) / (norm_a * norm_b) + 1.0) / 2.0
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{VECTOR_STORE_PROVIDERS, VectorStoreProviderEntry};

#[linkme::distributed_slice(VECTOR_STORE_PROVIDERS)]
static MEMORY_PROVIDER: VectorStoreProviderEntry = VectorStoreProviderEntry {
    name: "memory",
    description: "In-memory vector store (fast, non-persistent)",
    factory: |_settings| Ok(std::sync::Arc::new(InMemoryVectorStore::new())),
};
