//! Bridge ledger implementations
//!
//! The production ledger is a table in the external relational store; the
//! implementations here back tests and standalone deployments.

pub mod in_memory;
pub mod null;

pub use in_memory::InMemoryBridgeLedger;
pub use null::NullBridgeLedger;
