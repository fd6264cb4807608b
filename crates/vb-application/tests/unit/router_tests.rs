//! Provider router policy and fallback tests

use std::sync::Arc;

use vb_application::routing::RoutingSnapshot;
use vb_domain::error::Error;
use vb_domain::value_objects::RoutePreference;

use crate::support::{FailingProvider, FailureMode, StubProvider, endpoint, router};

fn two_adapter_snapshot(
    local: Arc<StubProvider>,
    hosted: Arc<StubProvider>,
) -> RoutingSnapshot {
    RoutingSnapshot::builder(1)
        .endpoint(endpoint("local", local, 10, false, 0.0))
        .endpoint(endpoint("hosted", hosted, 20, true, 0.001))
        .balanced_batch_threshold(50)
        .build()
}

#[tokio::test]
async fn fast_prefers_local_quality_prefers_hosted() {
    let local = Arc::new(StubProvider::new("local"));
    let hosted = Arc::new(StubProvider::new("hosted"));
    let router = router(two_adapter_snapshot(local, hosted));

    assert_eq!(
        router.selection_order(1, Some(RoutePreference::Fast), 1),
        vec!["local", "hosted"]
    );
    assert_eq!(
        router.selection_order(1, Some(RoutePreference::Quality), 1),
        vec!["hosted", "local"]
    );
}

#[tokio::test]
async fn balanced_routes_by_batch_size() {
    let local = Arc::new(StubProvider::new("local"));
    let hosted = Arc::new(StubProvider::new("hosted"));
    let router = router(two_adapter_snapshot(local, hosted));

    // Small batches go hosted for fidelity, large ones local to bound cost
    assert_eq!(
        router.selection_order(1, Some(RoutePreference::Balanced), 10),
        vec!["hosted", "local"]
    );
    assert_eq!(
        router.selection_order(1, Some(RoutePreference::Balanced), 50),
        vec!["local", "hosted"]
    );
}

#[tokio::test]
async fn tenant_preference_applies_when_request_has_none() {
    let local = Arc::new(StubProvider::new("local"));
    let hosted = Arc::new(StubProvider::new("hosted"));
    let snapshot = RoutingSnapshot::builder(1)
        .endpoint(endpoint("local", local, 10, false, 0.0))
        .endpoint(endpoint("hosted", hosted, 20, true, 0.001))
        .tenant_preference(7, RoutePreference::Quality)
        .build();
    let router = router(snapshot);

    assert_eq!(router.selection_order(7, None, 1), vec!["hosted", "local"]);
    // Default preference is balanced; small batch leads hosted too, so
    // check a large batch to see the difference
    assert_eq!(router.selection_order(8, None, 60), vec!["local", "hosted"]);
    // Explicit request preference wins over the tenant default
    assert_eq!(
        router.selection_order(7, Some(RoutePreference::Fast), 1),
        vec!["local", "hosted"]
    );
}

#[tokio::test]
async fn failing_primary_falls_back_to_secondary() {
    let primary = Arc::new(FailingProvider::new("primary", FailureMode::Timeout));
    let secondary = Arc::new(StubProvider::new("secondary"));
    let snapshot = RoutingSnapshot::builder(1)
        .endpoint(endpoint("primary", primary.clone(), 10, true, 0.001))
        .endpoint(endpoint("secondary", secondary.clone(), 20, false, 0.0))
        .build();
    let router = router(snapshot);

    let batch = router
        .embed_batch(1, &["hello".to_string()], Some(RoutePreference::Quality))
        .await
        .expect("secondary must serve the request");

    assert_eq!(batch.provider, "secondary");
    // One attempt plus one retry on the primary, then one on the secondary
    assert_eq!(primary.calls(), 2);
    assert_eq!(secondary.calls(), 1);
}

#[tokio::test]
async fn quota_rejection_burns_down_the_chain() {
    let primary = Arc::new(FailingProvider::new("primary", FailureMode::Quota));
    let secondary = Arc::new(StubProvider::new("secondary"));
    let snapshot = RoutingSnapshot::builder(1)
        .endpoint(endpoint("primary", primary, 10, true, 0.001))
        .endpoint(endpoint("secondary", secondary, 20, false, 0.0))
        .build();
    let router = router(snapshot);

    let batch = router
        .embed_batch(1, &["hello".to_string()], Some(RoutePreference::Quality))
        .await
        .unwrap();
    assert_eq!(batch.provider, "secondary");
}

#[tokio::test]
async fn non_quota_rejection_propagates_immediately() {
    let primary = Arc::new(FailingProvider::new("primary", FailureMode::Rejected));
    let secondary = Arc::new(StubProvider::new("secondary"));
    let snapshot = RoutingSnapshot::builder(1)
        .endpoint(endpoint("primary", primary.clone(), 10, true, 0.001))
        .endpoint(endpoint("secondary", secondary.clone(), 20, false, 0.0))
        .build();
    let router = router(snapshot);

    let err = router
        .embed_batch(1, &["hello".to_string()], Some(RoutePreference::Quality))
        .await
        .expect_err("rejection must propagate");

    assert!(matches!(err, Error::ProviderRejected { status: 400, .. }));
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn exhausted_chain_reports_every_adapter_tried() {
    let a = Arc::new(FailingProvider::new("a", FailureMode::Timeout));
    let b = Arc::new(FailingProvider::new("b", FailureMode::Timeout));
    let snapshot = RoutingSnapshot::builder(1)
        .endpoint(endpoint("a", a, 10, true, 0.001))
        .endpoint(endpoint("b", b, 20, false, 0.0))
        .build();
    let router = router(snapshot);

    let err = router
        .embed_batch(1, &["hello".to_string()], Some(RoutePreference::Quality))
        .await
        .expect_err("chain must exhaust");

    match err {
        Error::ProviderExhausted { attempted, .. } => {
            assert!(attempted.contains('a'));
            assert!(attempted.contains('b'));
        }
        other => panic!("expected ProviderExhausted, got {other}"),
    }
}

#[tokio::test]
async fn snapshot_swap_is_visible_to_new_requests() {
    let local = Arc::new(StubProvider::new("local"));
    let hosted = Arc::new(StubProvider::new("hosted"));
    let router = router(two_adapter_snapshot(local.clone(), hosted));

    let replacement = RoutingSnapshot::builder(2)
        .endpoint(endpoint("local", local, 10, false, 0.0))
        .build();
    router.install_snapshot(replacement);

    assert_eq!(router.current_snapshot().version, 2);
    assert_eq!(
        router.selection_order(1, Some(RoutePreference::Quality), 1),
        vec!["local"]
    );
}
