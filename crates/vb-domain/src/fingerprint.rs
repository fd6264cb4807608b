//! Input fingerprints
//!
//! Cache keys are fingerprints of normalized input, never raw text: keys
//! stay bounded in size and equivalent inputs collide on purpose.

use sha2::{Digest, Sha256};

/// Fingerprint of ingested content (whitespace-trimmed)
pub fn content_fingerprint(text: &str) -> String {
    digest(text.trim())
}

/// Fingerprint of an interactive query
///
/// Queries are case-folded and whitespace-collapsed first, so trivially
/// reworded repeats of the same question hit the result cache.
pub fn query_fingerprint(query: &str) -> String {
    let normalized = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    digest(&normalized)
}

fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
