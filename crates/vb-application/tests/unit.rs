//! Unit test suite for vb-application
//!
//! Run with: `cargo test -p vb-application --test unit`

#[path = "unit/support.rs"]
mod support;

#[path = "unit/registry_tests.rs"]
mod registry_tests;

#[path = "unit/router_tests.rs"]
mod router_tests;

#[path = "unit/collection_tests.rs"]
mod collection_tests;

#[path = "unit/ingestion_tests.rs"]
mod ingestion_tests;

#[path = "unit/query_tests.rs"]
mod query_tests;

#[path = "unit/reconciliation_tests.rs"]
mod reconciliation_tests;
