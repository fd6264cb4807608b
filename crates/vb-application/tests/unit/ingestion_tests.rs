//! Ingestion pipeline tests
//!
//! Covers the batch partitioning scenario, per-record failure isolation,
//! fallback under provider outage, and embedding-cache correctness.

use std::sync::Arc;
use std::time::Duration;

use vb_application::routing::RoutingSnapshot;
use vb_application::services::IngestionConfig;
use vb_domain::ports::infrastructure::BridgeLedger;
use vb_domain::ports::providers::VectorStoreProvider;
use vb_domain::value_objects::{IngestionJob, RoutePreference, SourceRecord, VectorType};

use crate::support::{
    FailingProvider, FailureMode, StubProvider, cache, endpoint, pipeline_with,
    pipeline_with_cache, records, router,
};

fn single_provider_router(provider: Arc<StubProvider>) -> Arc<vb_application::routing::ProviderRouter> {
    router(
        RoutingSnapshot::builder(1)
            .endpoint(endpoint("stub", provider, 10, false, 0.0))
            .build(),
    )
}

#[tokio::test]
async fn ingests_250_records_in_three_batches() {
    let provider = Arc::new(StubProvider::new("stub"));
    let harness = pipeline_with(
        single_provider_router(provider.clone()),
        IngestionConfig::default(),
    );

    let job = IngestionJob::new(
        1,
        "issues",
        records(250),
        VectorType::Content,
        RoutePreference::Balanced,
    );
    let progress = harness.pipeline.ingest(&job).await.unwrap();

    assert_eq!(progress.total, 250);
    assert_eq!(progress.processed, 250);
    assert_eq!(progress.succeeded, 250);
    assert_eq!(progress.failed, 0);
    assert!(progress.is_complete());

    // 250 records at batch size 100 -> batches of 100, 100, 50, one
    // provider call each
    assert_eq!(harness.pipeline.batch_size_for(250), 100);
    assert_eq!(provider.calls(), 3);
    assert_eq!(provider.items(), 250);

    // Every record has exactly one ledger row and one index point
    assert_eq!(harness.ledger.active_count(), 250);
    let points = harness.store.list_point_ids("tenant_1_issues").await.unwrap();
    assert_eq!(points.len(), 250);
}

#[tokio::test]
async fn one_bad_record_is_isolated_and_attributed() {
    let provider = Arc::new(StubProvider::new("stub"));
    let harness = pipeline_with(
        single_provider_router(provider),
        IngestionConfig {
            batch_min: 1,
            batch_max: 200,
            concurrency: 4,
        },
    );

    let mut batch = records(10);
    // Record #7 has nothing to extract for the content projection
    batch[6].summary.clear();
    batch[6].description.clear();

    let job = IngestionJob::new(1, "issues", batch, VectorType::Content, RoutePreference::Fast);
    let progress = harness.pipeline.ingest(&job).await.unwrap();

    assert_eq!(progress.processed, 10);
    assert_eq!(progress.succeeded, 9);
    assert_eq!(progress.failed, 1);

    // The failure is attributed to record #7: every other record committed
    assert_eq!(harness.ledger.active_count(), 9);
    for id in (1..=10).filter(|i| *i != 7) {
        let key = vb_domain::value_objects::BridgeKey::new(
            1,
            "issues",
            id.to_string(),
            VectorType::Content,
        );
        assert!(
            harness.ledger.get_active(&key).await.unwrap().is_some(),
            "record {id} must have a ledger row"
        );
    }
    let key = vb_domain::value_objects::BridgeKey::new(1, "issues", "7", VectorType::Content);
    assert!(harness.ledger.get_active(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn provider_outage_degrades_to_the_fallback_chain() {
    let primary = Arc::new(FailingProvider::new("primary", FailureMode::Timeout));
    let secondary = Arc::new(StubProvider::new("secondary"));
    let snapshot = RoutingSnapshot::builder(1)
        .endpoint(endpoint("primary", primary.clone(), 10, true, 0.001))
        .endpoint(endpoint("secondary", secondary.clone(), 20, false, 0.0))
        .build();
    let harness = pipeline_with(router(snapshot), IngestionConfig::default());

    let job = IngestionJob::new(
        1,
        "issues",
        records(10),
        VectorType::Content,
        RoutePreference::Quality,
    );
    let progress = harness.pipeline.ingest(&job).await.unwrap();

    // Every record embedded by the secondary, none silently dropped
    assert_eq!(progress.succeeded, 10);
    assert_eq!(progress.failed, 0);
    assert_eq!(secondary.items(), 10);
    assert!(primary.calls() > 0);

    let rows = harness
        .ledger
        .active_for_collection("tenant_1_issues")
        .await
        .unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.embedding_provider == "secondary"));
}

#[tokio::test]
async fn identical_content_within_ttl_skips_the_provider() {
    let provider = Arc::new(StubProvider::new("stub"));
    let harness = pipeline_with(
        single_provider_router(provider.clone()),
        IngestionConfig::default(),
    );

    let record = SourceRecord::new("42", "the same content every time");
    let first = harness
        .pipeline
        .store_record(1, "issues", record.clone(), VectorType::Content, None)
        .await
        .unwrap();
    assert_eq!(first.provider, "stub");
    assert_eq!(provider.calls(), 1);

    // Second call within TTL: zero provider calls, served from cache
    let second = harness
        .pipeline
        .store_record(1, "issues", record, VectorType::Content, None)
        .await
        .unwrap();
    assert_eq!(second.provider, "cache");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn expired_cache_entry_costs_exactly_one_provider_call() {
    let provider = Arc::new(StubProvider::new("stub"));
    let harness = pipeline_with_cache(
        single_provider_router(provider.clone()),
        IngestionConfig::default(),
        cache(Duration::from_millis(60)),
    );

    let record = SourceRecord::new("42", "short lived cache entry");
    harness
        .pipeline
        .store_record(1, "issues", record.clone(), VectorType::Content, None)
        .await
        .unwrap();
    assert_eq!(provider.calls(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let after_expiry = harness
        .pipeline
        .store_record(1, "issues", record.clone(), VectorType::Content, None)
        .await
        .unwrap();
    assert_eq!(after_expiry.provider, "stub");
    assert_eq!(provider.calls(), 2);

    // The refreshed entry serves the next call again
    let refreshed = harness
        .pipeline
        .store_record(1, "issues", record, VectorType::Content, None)
        .await
        .unwrap();
    assert_eq!(refreshed.provider, "cache");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn embedding_cache_is_tenant_scoped() {
    let provider = Arc::new(StubProvider::new("stub"));
    let harness = pipeline_with(
        single_provider_router(provider.clone()),
        IngestionConfig::default(),
    );

    let record = SourceRecord::new("42", "shared content");
    harness
        .pipeline
        .store_record(1, "issues", record.clone(), VectorType::Content, None)
        .await
        .unwrap();
    // Same content under another tenant misses: no cross-tenant leakage
    harness
        .pipeline
        .store_record(2, "issues", record, VectorType::Content, None)
        .await
        .unwrap();
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn re_ingesting_a_record_supersedes_its_old_point() {
    let provider = Arc::new(StubProvider::new("stub"));
    let harness = pipeline_with(
        single_provider_router(provider),
        IngestionConfig::default(),
    );

    let first = harness
        .pipeline
        .store_record(
            1,
            "issues",
            SourceRecord::new("42", "original content"),
            VectorType::Content,
            None,
        )
        .await
        .unwrap();
    let second = harness
        .pipeline
        .store_record(
            1,
            "issues",
            SourceRecord::new("42", "edited content"),
            VectorType::Content,
            None,
        )
        .await
        .unwrap();
    assert_ne!(first.point_id, second.point_id);

    // One active row, and the replaced point is gone from the index
    assert_eq!(harness.ledger.active_count(), 1);
    let points = harness.store.list_point_ids("tenant_1_issues").await.unwrap();
    assert_eq!(points, vec![second.point_id]);
}

#[tokio::test]
async fn cancellation_drains_in_flight_batches_and_schedules_no_more() {
    let provider = Arc::new(StubProvider::with_delay(
        "slow",
        Duration::from_millis(100),
    ));
    let harness = pipeline_with(
        single_provider_router(provider),
        IngestionConfig {
            batch_min: 1,
            batch_max: 1,
            concurrency: 1,
        },
    );

    let job = IngestionJob::new(
        1,
        "issues",
        records(6),
        VectorType::Content,
        RoutePreference::Fast,
    );
    let mut handle = harness.pipeline.start(job);

    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.cancel();
    let finished = handle.wait().await;

    // In-flight work completed (no torn writes), the tail never started
    assert!(finished.processed >= 1, "at least one batch ran");
    assert!(finished.processed < 6, "cancellation must stop the tail");
    assert_eq!(finished.failed, 0);
    assert_eq!(
        harness.ledger.active_count() as u64,
        finished.succeeded,
        "every processed record is fully committed"
    );
}
