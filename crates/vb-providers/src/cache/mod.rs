//! Cache provider implementations

pub mod moka;
pub mod null;

pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;
