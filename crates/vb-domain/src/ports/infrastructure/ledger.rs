//! Bridge ledger port
//!
//! Transactional access to the relational table linking source records to
//! vector-index points. The concrete store lives outside this engine; the
//! port is the only thing that crosses the boundary.
//!
//! Write ordering is the engine's consistency mechanism: the vector upsert
//! happens-before `commit`, and a commit that supersedes a predecessor
//! returns it so the caller can delete the replaced point afterwards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::value_objects::{BridgeKey, BridgeRecord};

/// Durable cross-store reference ledger
#[async_trait]
pub trait BridgeLedger: Send + Sync {
    /// Commit a row as the active mapping for its key
    ///
    /// Any previously active row for the same key is marked superseded in
    /// the same transaction and returned, so the caller can delete its
    /// point. At no moment does the key have zero committed rows.
    async fn commit(&self, record: BridgeRecord) -> Result<Option<BridgeRecord>>;

    /// Active row for a key, if any
    async fn get_active(&self, key: &BridgeKey) -> Result<Option<BridgeRecord>>;

    /// All active rows pointing into a collection (reconciliation scan)
    async fn active_for_collection(&self, collection: &str) -> Result<Vec<BridgeRecord>>;

    /// Mark a key's active row superseded without a replacement
    ///
    /// Used by reconciliation to quarantine rows whose point is gone.
    async fn quarantine(&self, key: &BridgeKey, at: DateTime<Utc>) -> Result<()>;

    /// Identifier of this ledger backend (e.g. "memory", "null")
    fn provider_name(&self) -> &str;
}
