//! Vector store provider implementations

pub mod in_memory;
pub mod null;

pub use in_memory::InMemoryVectorStore;
pub use null::NullVectorStore;
