//! Infrastructure ports

pub mod ledger;
pub mod metrics;

pub use ledger::BridgeLedger;
pub use metrics::{MetricsSink, MetricsSnapshot, NullMetricsSink, ProviderUsage};
