//! Cross-store reconciliation
//!
//! The ledger and the vector index have no shared transaction; the write
//! ordering (upsert happens-before commit) plus this pass are the
//! consistency mechanism. The scan compares both sides of a collection:
//! a point with no active ledger row is deleted, an active row with no
//! point is quarantined so re-ingestion recreates it. Inconsistency is
//! bounded to mid-batch windows.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vb_domain::error::Result;
use vb_domain::ports::infrastructure::{BridgeLedger, MetricsSink};

use super::collection_manager::CollectionManager;

/// Outcome of one reconciliation scan
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Collection that was scanned
    pub collection: String,
    /// Points deleted because no active row references them
    pub orphan_points_deleted: u64,
    /// Rows quarantined because their point is gone
    pub rows_quarantined: u64,
}

impl ReconcileReport {
    /// Whether the scan found both sides consistent
    pub fn is_clean(&self) -> bool {
        self.orphan_points_deleted == 0 && self.rows_quarantined == 0
    }
}

/// Cadence policy for the reconciliation pass
#[derive(Debug, Clone)]
pub struct ReconcilePolicy {
    /// Never run more often than this
    pub min_interval: Duration,
    /// Always run once this much time has passed
    pub max_interval: Duration,
    /// Ingested-record count that justifies an early run
    pub record_threshold: u64,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(60),
            max_interval: Duration::from_secs(15 * 60),
            record_threshold: 1_000,
        }
    }
}

/// Observable signals the cadence decision is a function of
#[derive(Debug, Clone, Copy)]
pub struct ReconcileSignals {
    /// Records ingested since the last pass
    pub new_records: u64,
    /// Time since the last pass
    pub elapsed_since_last: Duration,
    /// Orphans the pipeline already knows it produced
    pub known_orphans: u64,
}

/// Whether a pass is due
///
/// Pure function of observable signals, evaluated per orchestration tick.
/// There is no persisted schedule state to drift or to migrate.
pub fn should_reconcile(policy: &ReconcilePolicy, signals: &ReconcileSignals) -> bool {
    if signals.elapsed_since_last < policy.min_interval {
        return false;
    }
    signals.known_orphans > 0
        || signals.new_records >= policy.record_threshold
        || signals.elapsed_since_last >= policy.max_interval
}

/// The reconciliation pass
pub struct Reconciler {
    collections: Arc<CollectionManager>,
    ledger: Arc<dyn BridgeLedger>,
    metrics: Arc<dyn MetricsSink>,
}

impl Reconciler {
    /// Wire the pass to both stores
    pub fn new(
        collections: Arc<CollectionManager>,
        ledger: Arc<dyn BridgeLedger>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            collections,
            ledger,
            metrics,
        }
    }

    /// Scan one collection and repair both directions
    pub async fn reconcile_collection(&self, collection: &str) -> Result<ReconcileReport> {
        let point_ids: HashSet<String> = self
            .collections
            .list_point_ids(collection)
            .await?
            .into_iter()
            .collect();
        let rows = self.ledger.active_for_collection(collection).await?;
        let referenced: HashSet<&str> = rows.iter().map(|r| r.point_id.as_str()).collect();

        let mut report = ReconcileReport {
            collection: collection.to_string(),
            ..Default::default()
        };

        // Index side: points nothing references any more
        let orphans: Vec<String> = point_ids
            .iter()
            .filter(|id| !referenced.contains(id.as_str()))
            .cloned()
            .collect();
        if !orphans.is_empty() {
            warn!(
                collection,
                count = orphans.len(),
                "deleting orphaned points"
            );
            self.collections.delete_points(collection, &orphans).await?;
            report.orphan_points_deleted = orphans.len() as u64;
            self.metrics.record_error("ledger_orphan");
        }

        // Ledger side: active rows whose point disappeared are quarantined,
        // never silently re-embedded
        for row in rows {
            if !point_ids.contains(&row.point_id) {
                warn!(
                    collection,
                    record_id = %row.source_record_id,
                    point_id = %row.point_id,
                    "quarantining row with missing point"
                );
                self.ledger
                    .quarantine(&row.key(), chrono::Utc::now())
                    .await?;
                report.rows_quarantined += 1;
            }
        }

        if report.is_clean() {
            info!(collection, "reconciliation clean");
        } else {
            info!(
                collection,
                orphan_points = report.orphan_points_deleted,
                quarantined = report.rows_quarantined,
                "reconciliation repaired inconsistencies"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_respects_min_interval() {
        let policy = ReconcilePolicy::default();
        assert!(!should_reconcile(
            &policy,
            &ReconcileSignals {
                new_records: 100_000,
                elapsed_since_last: Duration::from_secs(1),
                known_orphans: 10,
            }
        ));
    }

    #[test]
    fn cadence_triggers_on_orphans_records_or_staleness() {
        let policy = ReconcilePolicy::default();
        let base = ReconcileSignals {
            new_records: 0,
            elapsed_since_last: Duration::from_secs(120),
            known_orphans: 0,
        };
        assert!(!should_reconcile(&policy, &base));
        assert!(should_reconcile(
            &policy,
            &ReconcileSignals {
                known_orphans: 1,
                ..base
            }
        ));
        assert!(should_reconcile(
            &policy,
            &ReconcileSignals {
                new_records: 1_000,
                ..base
            }
        ));
        assert!(should_reconcile(
            &policy,
            &ReconcileSignals {
                elapsed_since_last: Duration::from_secs(16 * 60),
                ..base
            }
        ));
    }
}
