//! Embedding provider implementations
//!
//! Uniform capability adapters over concrete AI backends. Each returns an
//! [`vb_domain::value_objects::EmbeddingBatch`] carrying the measured
//! latency and configured per-call cost the router logs and bills with.

pub mod gemini;
pub mod helpers;
pub mod null;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiEmbeddingProvider;
pub use null::NullEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
