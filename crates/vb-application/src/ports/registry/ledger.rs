//! Bridge ledger registry
//!
//! The production ledger lives in the external relational store; the
//! registry exists so deployments and tests can swap backends the same way
//! they swap any other provider.

use std::sync::Arc;

use vb_domain::error::{Error, Result};
use vb_domain::ports::infrastructure::BridgeLedger;

/// Configuration for bridge ledger creation
#[derive(Debug, Clone, Default)]
pub struct BridgeLedgerSettings {
    /// Backend name (e.g. "memory", "null")
    pub provider: String,
    /// Connection string for relational backends
    pub connection: Option<String>,
}

impl BridgeLedgerSettings {
    /// Create settings for the named backend
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }
}

/// Registry entry for bridge ledger backends
pub struct BridgeLedgerEntry {
    /// Unique backend name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create ledger instances
    pub factory: fn(&BridgeLedgerSettings) -> Result<Arc<dyn BridgeLedger>>,
}

#[linkme::distributed_slice]
pub static BRIDGE_LEDGERS: [BridgeLedgerEntry] = [..];

/// Resolve a bridge ledger backend by name from the registry
pub fn resolve_bridge_ledger(settings: &BridgeLedgerSettings) -> Result<Arc<dyn BridgeLedger>> {
    for entry in BRIDGE_LEDGERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }

    let available: Vec<&str> = BRIDGE_LEDGERS.iter().map(|e| e.name).collect();
    Err(Error::config(format!(
        "unknown bridge ledger '{}', available: {available:?}",
        settings.provider
    )))
}

/// List all registered ledger backends as (name, description) pairs
pub fn list_bridge_ledgers() -> Vec<(&'static str, &'static str)> {
    BRIDGE_LEDGERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
