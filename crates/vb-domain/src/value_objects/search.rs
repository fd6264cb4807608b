//! Search value objects

use serde::{Deserialize, Serialize};

use super::record::VectorType;

/// One ranked match from a semantic search
///
/// ## Business rules
///
/// - Score is normalized similarity, higher is better
/// - `record_id` points back at the source-of-record row via the bridge ledger
/// - The preview is a truncated projection, never the full record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchMatch {
    /// Source-of-record row id of the match
    pub record_id: String,
    /// Similarity score (0.0 to 1.0, higher is better)
    pub score: f64,
    /// Truncated preview of the embedded content
    pub content_preview: String,
    /// Which projection the matched vector represents
    pub vector_type: VectorType,
}

/// Result envelope of one semantic query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Ranked matches, best first
    pub matches: Vec<SearchMatch>,
    /// Adapter that embedded the query ("cache" on a result-cache hit)
    pub provider_used: String,
    /// End-to-end processing time
    pub processing_time_ms: u64,
}
