//! Query-complexity heuristics
//!
//! Cheap lexical scoring that gates the expensive concurrent retrieval
//! fan-out. The score lands in [0, 1]; queries under the threshold take
//! the single-pass path.

/// Keywords suggesting relational joins or cross-entity lookups
const JOIN_KEYWORDS: &[&str] = &["join", "combine", "related", "linked", "across", "with their"];

/// Keywords suggesting aggregation
const AGGREGATE_KEYWORDS: &[&str] = &[
    "count", "sum", "average", "avg", "total", "group", "per", "most", "least", "top",
];

/// Keywords suggesting a time-range constraint
const TIME_KEYWORDS: &[&str] = &[
    "since", "before", "after", "between", "last week", "last month", "yesterday", "today",
    "this year", "recent",
];

/// Keywords suggesting comparison
const COMPARISON_KEYWORDS: &[&str] = &[
    "more than", "less than", "greater", "fewer", "higher", "lower", "versus", "compared",
];

/// Boolean connectives
const CONNECTIVES: &[&str] = &["and", "or", "not", "but", "except"];

/// Score a query's complexity in [0, 1]
///
/// Signals, each capped and weighted:
/// - token count (long questions need more context)
/// - join / aggregate / time-range / comparison keywords
/// - boolean-connective count
pub fn complexity_score(query: &str) -> f64 {
    let lowered = query.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }

    // 20 tokens or more saturate the length signal
    let length_score = (tokens.len() as f64 / 20.0).min(1.0);

    let keyword_hits = count_hits(&lowered, JOIN_KEYWORDS)
        + count_hits(&lowered, AGGREGATE_KEYWORDS)
        + count_hits(&lowered, TIME_KEYWORDS)
        + count_hits(&lowered, COMPARISON_KEYWORDS);
    let keyword_score = (keyword_hits as f64 / 4.0).min(1.0);

    let connective_hits = tokens
        .iter()
        .filter(|t| CONNECTIVES.contains(t))
        .count();
    let connective_score = (connective_hits as f64 / 3.0).min(1.0);

    (0.3 * length_score + 0.5 * keyword_score + 0.2 * connective_score).clamp(0.0, 1.0)
}

fn count_hits(query: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| query.contains(*k)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_domain::constants::COMPLEXITY_SIMPLE_THRESHOLD;

    #[test]
    fn short_lookup_is_simple() {
        assert!(complexity_score("login bug") < COMPLEXITY_SIMPLE_THRESHOLD);
        assert!(complexity_score("payment errors") < COMPLEXITY_SIMPLE_THRESHOLD);
    }

    #[test]
    fn aggregation_with_time_range_is_complex() {
        let score = complexity_score(
            "count of login failures per customer since last month compared to the total",
        );
        assert!(score >= COMPLEXITY_SIMPLE_THRESHOLD, "score was {score}");
    }

    #[test]
    fn connectives_raise_the_score() {
        let plain = complexity_score("open issues about billing");
        let connected = complexity_score("open issues about billing and refunds or chargebacks but not disputes");
        assert!(connected > plain);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(complexity_score(""), 0.0);
        assert_eq!(complexity_score("   "), 0.0);
    }

    #[test]
    fn score_is_bounded() {
        let score = complexity_score(
            "join count sum average total group per most least top since before after \
             between more than less than greater versus compared and or not but except",
        );
        assert!((0.0..=1.0).contains(&score));
    }
}
