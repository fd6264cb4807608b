//! vectorbridge domain layer
//!
//! Core business types, the error taxonomy, and the port contracts that the
//! application layer orchestrates and the provider layer implements. This
//! crate is pure: no I/O, no runtime, no provider SDKs.

pub mod constants;
pub mod error;
pub mod fingerprint;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
