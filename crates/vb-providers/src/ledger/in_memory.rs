//! In-memory bridge ledger
//!
//! Keeps the active row per key in a concurrent map and superseded rows in
//! a history list. Uniqueness on (tenant, table, record, vector_type) is
//! the map key itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use vb_domain::error::Result;
use vb_domain::ports::infrastructure::BridgeLedger;
use vb_domain::value_objects::{BridgeKey, BridgeRecord};

/// In-memory bridge ledger
pub struct InMemoryBridgeLedger {
    active: DashMap<BridgeKey, BridgeRecord>,
    superseded: DashMap<String, Vec<BridgeRecord>>,
}

impl InMemoryBridgeLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
            superseded: DashMap::new(),
        }
    }

    /// Active row count across all keys
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Default for InMemoryBridgeLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BridgeLedger for InMemoryBridgeLedger {
    async fn commit(&self, record: BridgeRecord) -> Result<Option<BridgeRecord>> {
        let key = record.key();
        let previous = self.active.insert(key, record);
        let superseded = previous.map(|mut old| {
            old.superseded_at = Some(Utc::now());
            self.superseded
                .entry(old.collection_name.clone())
                .or_default()
                .push(old.clone());
            old
        });
        Ok(superseded)
    }

    async fn get_active(&self, key: &BridgeKey) -> Result<Option<BridgeRecord>> {
        Ok(self.active.get(key).map(|r| r.clone()))
    }

    async fn active_for_collection(&self, collection: &str) -> Result<Vec<BridgeRecord>> {
        Ok(self
            .active
            .iter()
            .filter(|entry| entry.collection_name == collection)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn quarantine(&self, key: &BridgeKey, at: DateTime<Utc>) -> Result<()> {
        if let Some((_, mut row)) = self.active.remove(key) {
            row.superseded_at = Some(at);
            self.superseded
                .entry(row.collection_name.clone())
                .or_default()
                .push(row);
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{BRIDGE_LEDGERS, BridgeLedgerEntry};

#[linkme::distributed_slice(BRIDGE_LEDGERS)]
static MEMORY_LEDGER: BridgeLedgerEntry = BridgeLedgerEntry {
    name: "memory",
    description: "In-memory bridge ledger (tests, standalone)",
    factory: |_settings| Ok(std::sync::Arc::new(InMemoryBridgeLedger::new())),
};

#[cfg(test)]
mod tests {
    use super::*;
    use vb_domain::value_objects::VectorType;

    fn row(record_id: &str, point_id: &str) -> BridgeRecord {
        BridgeRecord {
            tenant_id: 1,
            source_table: "issues".to_string(),
            source_record_id: record_id.to_string(),
            collection_name: "tenant_1_issues".to_string(),
            point_id: point_id.to_string(),
            vector_type: VectorType::Content,
            embedding_model: "null".to_string(),
            embedding_provider: "null".to_string(),
            created_at: Utc::now(),
            superseded_at: None,
        }
    }

    #[tokio::test]
    async fn commit_is_unique_per_key_and_supersedes() {
        let ledger = InMemoryBridgeLedger::new();

        assert!(ledger.commit(row("42", "p1")).await.unwrap().is_none());
        let superseded = ledger.commit(row("42", "p2")).await.unwrap();

        let old = superseded.expect("first row must be superseded");
        assert_eq!(old.point_id, "p1");
        assert!(old.superseded_at.is_some());

        let active = ledger.get_active(&row("42", "p2").key()).await.unwrap();
        assert_eq!(active.unwrap().point_id, "p2");
        assert_eq!(ledger.active_count(), 1);
    }

    #[tokio::test]
    async fn quarantine_removes_the_active_row() {
        let ledger = InMemoryBridgeLedger::new();
        ledger.commit(row("42", "p1")).await.unwrap();

        let key = row("42", "p1").key();
        ledger.quarantine(&key, Utc::now()).await.unwrap();
        assert!(ledger.get_active(&key).await.unwrap().is_none());
        assert!(
            ledger
                .active_for_collection("tenant_1_issues")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
