//! Infrastructure layer - vectorbridge
//!
//! Cross-cutting concerns: configuration loading and hot reload, logging
//! initialization, the metrics collector behind the performance endpoint,
//! and the bootstrap that wires providers into a running engine.

// Force-link vb-providers so linkme registrations are included even when
// only this crate is depended on
extern crate vb_providers;

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod metrics;

pub use bootstrap::EngineContext;
pub use config::{AppConfig, ConfigLoader, ConfigWatcher};
pub use metrics::EngineMetrics;
