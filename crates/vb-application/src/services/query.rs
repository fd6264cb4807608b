//! Interactive semantic queries
//!
//! Fingerprint -> result cache -> complexity classification -> retrieval.
//! The cheap heuristic gates the expensive concurrent fan-out: simple
//! queries take a single-pass search, complex ones fan out across the
//! collection's projections and the cached tenant context before the
//! results are merged. This tiering is what bounds p95 latency.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tokio::sync::Semaphore;
use tracing::debug;

use vb_domain::constants::{
    COMPLEXITY_SIMPLE_THRESHOLD, DEFAULT_QUERY_CONCURRENCY, PAYLOAD_KEY_PREVIEW,
    PAYLOAD_KEY_RECORD, PAYLOAD_KEY_VECTOR_TYPE,
};
use vb_domain::error::{Error, Result};
use vb_domain::ports::providers::ScoredPoint;
use vb_domain::value_objects::{
    CollectionSpec, QueryRoute, RoutePreference, SearchMatch, SearchOutcome, TenantId, VectorType,
};

use crate::cache::TieredCache;
use crate::routing::{ProviderRouter, complexity_score};

use super::collection_manager::CollectionManager;

/// Query service tuning knobs
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Complexity score below which a query takes the single-pass path
    pub simple_threshold: f64,
    /// Concurrent interactive queries in flight
    pub concurrency: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            simple_threshold: COMPLEXITY_SIMPLE_THRESHOLD,
            concurrency: DEFAULT_QUERY_CONCURRENCY,
        }
    }
}

/// Query-complexity router and search orchestrator
pub struct QueryService {
    router: Arc<ProviderRouter>,
    cache: Arc<TieredCache>,
    collections: Arc<CollectionManager>,
    config: QueryConfig,
    // Separate from the ingestion pool, so backfills cannot starve
    // interactive traffic
    permits: Arc<Semaphore>,
}

impl QueryService {
    /// Wire the service to its collaborators
    pub fn new(
        router: Arc<ProviderRouter>,
        cache: Arc<TieredCache>,
        collections: Arc<CollectionManager>,
        config: QueryConfig,
    ) -> Self {
        let permits = config.concurrency.max(1);
        Self {
            router,
            cache,
            collections,
            config,
            permits: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Classify a query without executing it
    pub async fn route(&self, tenant_id: TenantId, query_text: &str) -> Result<QueryRoute> {
        if self.cache.get_result(tenant_id, query_text).await?.is_some() {
            return Ok(QueryRoute::Cached);
        }
        Ok(self.classify(query_text))
    }

    /// Execute a semantic search for (tenant, table, query)
    pub async fn search(
        &self,
        tenant_id: TenantId,
        table: &str,
        query_text: &str,
        limit: usize,
        preference: Option<RoutePreference>,
    ) -> Result<SearchOutcome> {
        if query_text.trim().is_empty() {
            return Err(Error::invalid_input("query text cannot be empty"));
        }
        if limit == 0 {
            return Err(Error::invalid_input("limit must be at least 1"));
        }

        let started = Instant::now();
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::internal("query pool closed"))?;

        if let Some(mut matches) = self.cache.get_result(tenant_id, query_text).await? {
            matches.truncate(limit);
            debug!(tenant_id, route = %QueryRoute::Cached.as_str(), "query served from result cache");
            return Ok(SearchOutcome {
                matches,
                provider_used: "cache".to_string(),
                processing_time_ms: started.elapsed().as_millis() as u64,
            });
        }

        let route = self.classify(query_text);
        debug!(tenant_id, table, route = %route.as_str(), "query classified");

        let batch = self
            .router
            .embed_batch(tenant_id, &[query_text.to_string()], preference)
            .await?;
        let embedding = batch
            .embeddings
            .first()
            .ok_or_else(|| Error::internal("query embedding missing from batch"))?;
        let collection =
            CollectionSpec::new(tenant_id, table, embedding.dimensions).physical_name();

        let matches = match route {
            QueryRoute::Simple => {
                let points = self
                    .collections
                    .search(&collection, tenant_id, &embedding.vector, limit, None)
                    .await?;
                rank(points, limit)
            }
            _ => {
                let merged = self
                    .fan_out(tenant_id, &collection, &embedding.vector, limit)
                    .await?;
                // Only complex-path results earn a result-cache entry;
                // they are the ones worth not recomputing
                if let Err(e) = self.cache.put_result(tenant_id, query_text, &merged).await {
                    debug!(error = %e, "result cache write failed");
                }
                self.refresh_context(tenant_id, table).await;
                merged
            }
        };

        Ok(SearchOutcome {
            matches,
            provider_used: batch.provider,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn classify(&self, query_text: &str) -> QueryRoute {
        if complexity_score(query_text) < self.config.simple_threshold {
            QueryRoute::Simple
        } else {
            QueryRoute::Complex
        }
    }

    /// Concurrent retrieval fan-out across projections and cached context
    async fn fan_out(
        &self,
        tenant_id: TenantId,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchMatch>> {
        let (content, summary, metadata, _context) = tokio::join!(
            self.collections.search(
                collection,
                tenant_id,
                query_vector,
                limit,
                Some(VectorType::Content)
            ),
            self.collections.search(
                collection,
                tenant_id,
                query_vector,
                limit,
                Some(VectorType::Summary)
            ),
            self.collections.search(
                collection,
                tenant_id,
                query_vector,
                limit,
                Some(VectorType::Metadata)
            ),
            self.cache.get_context(tenant_id),
        );

        let mut points = content?;
        points.extend(summary?);
        points.extend(metadata?);
        Ok(rank(points, limit))
    }

    /// Refresh the tenant's cached retrieval context after a complex query
    async fn refresh_context(&self, tenant_id: TenantId, table: &str) {
        let context = match self.cache.get_context(tenant_id).await {
            Ok(Some(mut value)) => {
                if let Some(tables) = value.get_mut("tables").and_then(|t| t.as_object_mut()) {
                    tables.insert(table.to_string(), json!(chrono::Utc::now().timestamp()));
                }
                value
            }
            _ => json!({ "tables": { table: chrono::Utc::now().timestamp() } }),
        };
        if let Err(e) = self.cache.put_context(tenant_id, &context).await {
            debug!(error = %e, "context cache write failed");
        }
    }
}

/// Merge scored points into ranked matches
///
/// Deduplicates by record id, keeping the best-scoring projection, then
/// orders by score descending.
fn rank(points: Vec<ScoredPoint>, limit: usize) -> Vec<SearchMatch> {
    let mut best: std::collections::HashMap<String, SearchMatch> = std::collections::HashMap::new();
    for point in points {
        let Some(record_id) = point
            .payload
            .get(PAYLOAD_KEY_RECORD)
            .and_then(|v| v.as_str())
            .map(str::to_string)
        else {
            continue;
        };
        let vector_type = point
            .payload
            .get(PAYLOAD_KEY_VECTOR_TYPE)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<VectorType>().ok())
            .unwrap_or(VectorType::Content);
        let preview = point
            .payload
            .get(PAYLOAD_KEY_PREVIEW)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let candidate = SearchMatch {
            record_id: record_id.clone(),
            score: point.score,
            content_preview: preview,
            vector_type,
        };
        match best.get(&record_id) {
            Some(existing) if existing.score >= candidate.score => {}
            _ => {
                best.insert(record_id, candidate);
            }
        }
    }

    let mut matches: Vec<SearchMatch> = best.into_values().collect();
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn point(id: &str, record: &str, score: f64, vector_type: &str) -> ScoredPoint {
        ScoredPoint {
            id: id.to_string(),
            score,
            payload: HashMap::from([
                (PAYLOAD_KEY_RECORD.to_string(), json!(record)),
                (PAYLOAD_KEY_VECTOR_TYPE.to_string(), json!(vector_type)),
                (PAYLOAD_KEY_PREVIEW.to_string(), json!("preview")),
            ]),
        }
    }

    #[test]
    fn rank_dedupes_by_record_keeping_best_projection() {
        let ranked = rank(
            vec![
                point("p1", "42", 0.6, "content"),
                point("p2", "42", 0.9, "summary"),
                point("p3", "7", 0.7, "content"),
            ],
            10,
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].record_id, "42");
        assert_eq!(ranked[0].vector_type, VectorType::Summary);
        assert!((ranked[0].score - 0.9).abs() < f64::EPSILON);
        assert_eq!(ranked[1].record_id, "7");
    }

    #[test]
    fn rank_truncates_to_limit() {
        let points = (0..20)
            .map(|i| point(&format!("p{i}"), &format!("r{i}"), i as f64 / 20.0, "content"))
            .collect();
        let ranked = rank(points, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].record_id, "r19");
    }

    #[test]
    fn rank_skips_points_without_record_id() {
        let mut bad = point("p1", "42", 0.5, "content");
        bad.payload.remove(PAYLOAD_KEY_RECORD);
        assert!(rank(vec![bad], 10).is_empty());
    }
}
