//! Null bridge ledger
//!
//! Accepts every commit and remembers nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vb_domain::error::Result;
use vb_domain::ports::infrastructure::BridgeLedger;
use vb_domain::value_objects::{BridgeKey, BridgeRecord};

/// Null bridge ledger
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBridgeLedger;

impl NullBridgeLedger {
    /// Create a null ledger
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BridgeLedger for NullBridgeLedger {
    async fn commit(&self, _record: BridgeRecord) -> Result<Option<BridgeRecord>> {
        Ok(None)
    }

    async fn get_active(&self, _key: &BridgeKey) -> Result<Option<BridgeRecord>> {
        Ok(None)
    }

    async fn active_for_collection(&self, _collection: &str) -> Result<Vec<BridgeRecord>> {
        Ok(Vec::new())
    }

    async fn quarantine(&self, _key: &BridgeKey, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use vb_application::ports::registry::{BRIDGE_LEDGERS, BridgeLedgerEntry};

#[linkme::distributed_slice(BRIDGE_LEDGERS)]
static NULL_LEDGER: BridgeLedgerEntry = BridgeLedgerEntry {
    name: "null",
    description: "No-op bridge ledger",
    factory: |_settings| Ok(std::sync::Arc::new(NullBridgeLedger::new())),
};
