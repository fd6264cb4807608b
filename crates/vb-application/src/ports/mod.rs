//! Application-layer ports
//!
//! The provider registry slices concrete adapters register into.

pub mod registry;
