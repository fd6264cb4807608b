//! Cross-store reconciliation tests
//!
//! The no-orphan invariant: after a pass, every active ledger row has a
//! matching index point and vice versa.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use vb_application::services::{CollectionManager, Reconciler};
use vb_domain::constants::{PAYLOAD_KEY_RECORD, PAYLOAD_KEY_VECTOR_TYPE};
use vb_domain::ports::infrastructure::{BridgeLedger, NullMetricsSink};
use vb_domain::ports::providers::{VectorPoint, VectorStoreProvider};
use vb_domain::value_objects::{BridgeRecord, CollectionSpec, VectorType};
use vb_providers::ledger::InMemoryBridgeLedger;
use vb_providers::vector_store::InMemoryVectorStore;

const COLLECTION: &str = "tenant_1_issues";

struct ReconcileHarness {
    collections: Arc<CollectionManager>,
    ledger: Arc<InMemoryBridgeLedger>,
    reconciler: Reconciler,
    store: Arc<InMemoryVectorStore>,
}

async fn harness() -> ReconcileHarness {
    let store = Arc::new(InMemoryVectorStore::new());
    let collections = Arc::new(CollectionManager::new(store.clone()));
    collections
        .ensure_collection(&CollectionSpec::new(1, "issues", 4))
        .await
        .unwrap();
    let ledger = Arc::new(InMemoryBridgeLedger::new());
    let reconciler = Reconciler::new(
        Arc::clone(&collections),
        ledger.clone(),
        Arc::new(NullMetricsSink),
    );
    ReconcileHarness {
        collections,
        ledger,
        reconciler,
        store,
    }
}

fn point(id: &str, record_id: &str) -> VectorPoint {
    VectorPoint {
        id: id.to_string(),
        vector: vec![0.1, 0.2, 0.3, 0.4],
        payload: HashMap::from([
            (PAYLOAD_KEY_RECORD.to_string(), json!(record_id)),
            (PAYLOAD_KEY_VECTOR_TYPE.to_string(), json!("content")),
        ]),
    }
}

fn row(record_id: &str, point_id: &str) -> BridgeRecord {
    BridgeRecord {
        tenant_id: 1,
        source_table: "issues".to_string(),
        source_record_id: record_id.to_string(),
        collection_name: COLLECTION.to_string(),
        point_id: point_id.to_string(),
        vector_type: VectorType::Content,
        embedding_model: "stub-model".to_string(),
        embedding_provider: "stub".to_string(),
        created_at: chrono::Utc::now(),
        superseded_at: None,
    }
}

#[tokio::test]
async fn orphaned_points_are_deleted() {
    let h = harness().await;
    h.collections
        .upsert(COLLECTION, 1, vec![point("p1", "1"), point("p2", "2"), point("p3", "3")])
        .await
        .unwrap();
    // Only two points made it into the ledger before the "crash"
    h.ledger.commit(row("1", "p1")).await.unwrap();
    h.ledger.commit(row("2", "p2")).await.unwrap();

    let report = h.reconciler.reconcile_collection(COLLECTION).await.unwrap();

    assert_eq!(report.orphan_points_deleted, 1);
    assert_eq!(report.rows_quarantined, 0);
    let remaining: HashSet<String> = h
        .store
        .list_point_ids(COLLECTION)
        .await
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(remaining, HashSet::from(["p1".to_string(), "p2".to_string()]));
}

#[tokio::test]
async fn rows_with_missing_points_are_quarantined() {
    let h = harness().await;
    h.collections
        .upsert(COLLECTION, 1, vec![point("p1", "1")])
        .await
        .unwrap();
    h.ledger.commit(row("1", "p1")).await.unwrap();
    h.ledger.commit(row("2", "p-ghost")).await.unwrap();

    let report = h.reconciler.reconcile_collection(COLLECTION).await.unwrap();

    assert_eq!(report.orphan_points_deleted, 0);
    assert_eq!(report.rows_quarantined, 1);
    // The quarantined row is no longer active; the healthy one is untouched
    assert_eq!(h.ledger.active_count(), 1);
    assert!(
        h.ledger
            .get_active(&row("2", "p-ghost").key())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn both_sides_match_after_the_pass() {
    let h = harness().await;
    h.collections
        .upsert(
            COLLECTION,
            1,
            vec![point("p1", "1"), point("p2", "2"), point("p-orphan", "9")],
        )
        .await
        .unwrap();
    h.ledger.commit(row("1", "p1")).await.unwrap();
    h.ledger.commit(row("2", "p2")).await.unwrap();
    h.ledger.commit(row("3", "p-ghost")).await.unwrap();

    let report = h.reconciler.reconcile_collection(COLLECTION).await.unwrap();
    assert_eq!(report.orphan_points_deleted, 1);
    assert_eq!(report.rows_quarantined, 1);

    // No-orphan invariant: every active row has a point and vice versa
    let points: HashSet<String> = h
        .store
        .list_point_ids(COLLECTION)
        .await
        .unwrap()
        .into_iter()
        .collect();
    let rows: HashSet<String> = h
        .ledger
        .active_for_collection(COLLECTION)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.point_id)
        .collect();
    assert_eq!(points, rows);

    // A second pass finds nothing to repair
    let second = h.reconciler.reconcile_collection(COLLECTION).await.unwrap();
    assert!(second.is_clean());
}
