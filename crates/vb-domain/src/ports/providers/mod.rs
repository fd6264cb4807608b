//! Provider ports

pub mod cache;
pub mod embedding;
pub mod vector_store;

pub use cache::{CacheEntryConfig, CacheProvider, CacheStats};
pub use embedding::EmbeddingProvider;
pub use vector_store::{PayloadFilter, ScoredPoint, VectorPoint, VectorStoreProvider};
