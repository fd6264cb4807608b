//! Routing value objects

use serde::{Deserialize, Serialize};

/// Caller preference driving provider selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutePreference {
    /// Lowest latency / no cost: prefer the local adapter
    Fast,
    /// Cost-aware: batch size decides between local and hosted (default)
    #[default]
    Balanced,
    /// Highest fidelity: prefer the hosted adapter
    Quality,
}

impl RoutePreference {
    /// Wire name of the preference
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Quality => "quality",
        }
    }
}

impl std::fmt::Display for RoutePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoutePreference {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "quality" => Ok(Self::Quality),
            other => Err(crate::error::Error::invalid_input(format!(
                "unknown route preference '{other}', expected fast, balanced, or quality"
            ))),
        }
    }
}

/// Dispatch tier chosen for an interactive query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryRoute {
    /// Served straight from the result cache
    Cached,
    /// Single-pass generation, no retrieval fan-out
    Simple,
    /// Full concurrent retrieval fan-out before generation
    Complex,
}

impl QueryRoute {
    /// Wire name of the route
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cached => "cached",
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }
}
