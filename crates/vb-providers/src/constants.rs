//! Provider constants

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default OpenAI API base URL
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Gemini API base URL
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Ollama server URL
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default OpenAI embedding model
pub const OPENAI_DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Default Gemini embedding model
pub const GEMINI_DEFAULT_MODEL: &str = "text-embedding-004";

/// Default Ollama embedding model
pub const OLLAMA_DEFAULT_MODEL: &str = "nomic-embed-text";

/// text-embedding-3-small dimensions
pub const EMBEDDING_DIMENSION_OPENAI_SMALL: usize = 1536;

/// text-embedding-3-large dimensions
pub const EMBEDDING_DIMENSION_OPENAI_LARGE: usize = 3072;

/// text-embedding-ada-002 dimensions
pub const EMBEDDING_DIMENSION_OPENAI_ADA: usize = 1536;

/// text-embedding-004 dimensions
pub const EMBEDDING_DIMENSION_GEMINI: usize = 768;

/// nomic-embed-text dimensions
pub const EMBEDDING_DIMENSION_OLLAMA_NOMIC: usize = 768;

/// all-minilm dimensions
pub const EMBEDDING_DIMENSION_OLLAMA_MINILM: usize = 384;

/// mxbai-embed-large dimensions
pub const EMBEDDING_DIMENSION_OLLAMA_MXBAI: usize = 1024;

/// Fallback Ollama dimensions for unknown models
pub const EMBEDDING_DIMENSION_OLLAMA_DEFAULT: usize = 768;

/// Null provider dimensions (matches common small embedding models)
pub const EMBEDDING_DIMENSION_NULL: usize = 384;

/// Default cache capacity when none is configured
pub const CACHE_DEFAULT_CAPACITY: u64 = 10_000;
