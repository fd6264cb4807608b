//! Source records and vector-type extraction policy

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A business record handed over by the extraction framework
///
/// The engine never interprets the record beyond the extraction policy of
/// [`VectorType`]; everything else stays in the source-of-record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRecord {
    /// Source-of-record row identifier
    pub id: String,
    /// Short title of the record
    #[serde(default)]
    pub title: String,
    /// One-paragraph summary
    #[serde(default)]
    pub summary: String,
    /// Full description body
    #[serde(default)]
    pub description: String,
    /// Structured fields (ordered for deterministic joins)
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl SourceRecord {
    /// Create a record with just an id and free text in the description
    pub fn new<I: Into<String>, D: Into<String>>(id: I, description: D) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            summary: String::new(),
            description: description.into(),
            fields: BTreeMap::new(),
        }
    }
}

/// Which projection of a record a vector represents
///
/// One record can hold one vector per type; each (record, type) pair maps
/// to exactly one bridge ledger row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VectorType {
    /// Summary plus description body
    Content,
    /// Title only
    Summary,
    /// Structured fields joined as `key: value` lines
    Metadata,
}

impl VectorType {
    /// Extract the text this vector type embeds from a record
    pub fn extract_text(self, record: &SourceRecord) -> String {
        match self {
            Self::Content => {
                let mut text = record.summary.clone();
                if !text.is_empty() && !record.description.is_empty() {
                    text.push('\n');
                }
                text.push_str(&record.description);
                text
            }
            Self::Summary => record.title.clone(),
            Self::Metadata => record
                .fields
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Wire name of the vector type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Summary => "summary",
            Self::Metadata => "metadata",
        }
    }
}

impl std::fmt::Display for VectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VectorType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(Self::Content),
            "summary" => Ok(Self::Summary),
            "metadata" => Ok(Self::Metadata),
            other => Err(crate::error::Error::invalid_input(format!(
                "unknown vector type '{other}', expected content, summary, or metadata"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SourceRecord {
        SourceRecord {
            id: "42".into(),
            title: "Login fails on Safari".into(),
            summary: "Users cannot log in".into(),
            description: "Session cookie is dropped after redirect".into(),
            fields: BTreeMap::from([
                ("priority".to_string(), "high".to_string()),
                ("component".to_string(), "auth".to_string()),
            ]),
        }
    }

    #[test]
    fn content_joins_summary_and_description() {
        let text = VectorType::Content.extract_text(&record());
        assert_eq!(
            text,
            "Users cannot log in\nSession cookie is dropped after redirect"
        );
    }

    #[test]
    fn summary_is_title_only() {
        assert_eq!(
            VectorType::Summary.extract_text(&record()),
            "Login fails on Safari"
        );
    }

    #[test]
    fn metadata_joins_fields_deterministically() {
        // BTreeMap ordering: component before priority
        assert_eq!(
            VectorType::Metadata.extract_text(&record()),
            "component: auth\npriority: high"
        );
    }

    #[test]
    fn vector_type_round_trips_through_str() {
        for vt in [VectorType::Content, VectorType::Summary, VectorType::Metadata] {
            assert_eq!(vt.as_str().parse::<VectorType>().unwrap(), vt);
        }
        assert!("vibes".parse::<VectorType>().is_err());
    }
}
