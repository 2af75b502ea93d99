//! Core domain types shared across fetching, aggregation and rendering.

use crate::aggregate::cooccurrence::DEFAULT_TOP_PAIRS;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Version stamped into generated dashboards.
pub const REPORT_VERSION: &str = "2.1.0";

/// Dashboard the requester page links back to.
pub const NAVIGATION_TARGET: &str = "analyze_docs.html";

pub const AUTHORS_OUTPUT: &str = "authors_data.json";
pub const TOPICS_OUTPUT: &str = "topics_data.json";
pub const REQUESTERS_OUTPUT: &str = "requesters.html";

/// Runtime configuration.
///
/// Every field has a default so a missing or partial config file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub corpus_key: String,
    pub api_key: Option<String>,
    pub page_size: usize,
    pub output_dir: PathBuf,
    pub recency_days: i64,
    pub top_pairs: usize,
    pub min_topic_chars: usize,
    pub people_field: String,
    pub keywords_field: String,
    pub year_field: String,
    pub date_field: String,
    pub title_field: String,
    pub url_field: String,
    pub input_glob: String,
    pub fallback_encoding: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.vectara.io".to_string(),
            corpus_key: "mmm_docs5".to_string(),
            api_key: None,
            page_size: 100,
            output_dir: PathBuf::from("."),
            recency_days: 365,
            top_pairs: DEFAULT_TOP_PAIRS,
            min_topic_chars: 2,
            people_field: "ez_people".to_string(),
            keywords_field: "ez_keywords".to_string(),
            year_field: "ez_year".to_string(),
            date_field: "ez_date".to_string(),
            title_field: "title".to_string(),
            url_field: "url".to_string(),
            input_glob: "scrape_docs_*.csv".to_string(),
            fallback_encoding: "windows-1255".to_string(),
        }
    }
}

/// A document as returned by the remote corpus API.
///
/// A null or mistyped `id`/`metadata` decodes to the default instead of
/// failing the page it arrived in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Decode one element of a `documents` array; `None` when it is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Normalized view of one document, independent of where it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Date exactly as found in the source.
    pub date: Option<String>,
    pub parsed_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub authors: Vec<String>,
    pub team_leads: Vec<String>,
    pub keywords: Vec<String>,
    pub requester: Option<String>,
}

impl DocRecord {
    /// Authors joined for display in document summaries.
    pub fn author_display(&self) -> String {
        self.authors.join(", ")
    }

    pub fn summary(&self) -> DocSummary {
        DocSummary {
            title: self.title.clone(),
            url: self.url.clone(),
            date: self.date.clone().unwrap_or_default(),
            author: self.author_display(),
        }
    }
}

/// Per-document detail kept on an entity when details are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocSummary {
    pub title: String,
    pub url: String,
    pub date: String,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_default_pair_limit() {
        assert_eq!(Config::default().top_pairs, DEFAULT_TOP_PAIRS);
        assert_eq!(DEFAULT_TOP_PAIRS, 200);
    }

    #[test]
    fn test_document_null_fields_default() {
        let doc: Document = serde_json::from_value(json!({"id": null, "metadata": null})).unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_document_mistyped_fields() {
        let doc: Document =
            serde_json::from_value(json!({"id": 42, "metadata": ["not", "a", "map"]})).unwrap();
        assert_eq!(doc.id, "42");
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_document_from_value_rejects_non_objects() {
        assert!(Document::from_value(json!(null)).is_none());
        assert!(Document::from_value(json!("d1")).is_none());
        let doc = Document::from_value(json!({"id": "d1", "metadata": {"ez_people": "X"}})).unwrap();
        assert_eq!(doc.metadata["ez_people"], "X");
    }
}
