//! Loosely-typed metadata field decoding.
//!
//! Corpus metadata stores list-valued fields in several shapes depending on
//! which ingestion pipeline wrote the document:
//! - a native JSON array
//! - a JSON array encoded as a string (sometimes with single quotes)
//! - a comma-separated string
//! - a single scalar
//!
//! [`FieldValue::classify`] decides which shape a value has and
//! [`FieldValue::into_items`] expands it. Decoding never fails: anything that
//! cannot be parsed degrades to one literal item.

use serde_json::Value;

/// Shape of a raw metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    List(&'a [Value]),
    JsonString(&'a str),
    CsvString(&'a str),
    Scalar(String),
}

impl<'a> FieldValue<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::Array(items)) => FieldValue::List(items),
            Some(Value::String(s)) => {
                if s.trim_start().starts_with('[') {
                    FieldValue::JsonString(s)
                } else if s.contains(',') {
                    FieldValue::CsvString(s)
                } else {
                    FieldValue::Scalar(s.clone())
                }
            }
            Some(other) => FieldValue::Scalar(other.to_string()),
        }
    }

    pub fn into_items(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            FieldValue::Missing => Vec::new(),
            FieldValue::List(items) => items.iter().filter_map(item_text).collect(),
            FieldValue::JsonString(s) => match decode_json_list(s) {
                Some(items) => items,
                None => vec![s.to_string()],
            },
            FieldValue::CsvString(s) => s.split(',').map(str::to_string).collect(),
            FieldValue::Scalar(s) => vec![s],
        };

        raw.into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Normalize a metadata value into an ordered list of trimmed, non-empty strings.
pub fn normalize(value: Option<&Value>) -> Vec<String> {
    FieldValue::classify(value).into_items()
}

/// Normalize a plain string the same way a string-valued metadata field would be.
pub fn normalize_str(text: &str) -> Vec<String> {
    let value = Value::String(text.to_string());
    normalize(Some(&value))
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Strict JSON first, then the single-quoted pseudo-JSON some writers emit.
fn decode_json_list(text: &str) -> Option<Vec<String>> {
    let parsed = serde_json::from_str::<Value>(text)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(&text.replace('\'', "\"")).ok())?;

    match parsed {
        Value::Array(items) => Some(items.iter().filter_map(item_text).collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_encoded_list() {
        assert_eq!(normalize_str("[\"a\", \"b\"]"), vec!["a", "b"]);
    }

    #[test]
    fn test_comma_separated() {
        assert_eq!(normalize_str("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(normalize_str("single"), vec!["single"]);
    }

    #[test]
    fn test_missing_and_empty() {
        assert!(normalize(None).is_empty());
        assert!(normalize(Some(&Value::Null)).is_empty());
        assert!(normalize_str("").is_empty());
        assert!(normalize_str("   ").is_empty());
    }

    #[test]
    fn test_native_list_is_trimmed_and_filtered() {
        let value = json!([" דוד כהן ", "", null, "רות לוי"]);
        assert_eq!(normalize(Some(&value)), vec!["דוד כהן", "רות לוי"]);
    }

    #[test]
    fn test_single_quoted_pseudo_json() {
        assert_eq!(normalize_str("['חינוך', 'בריאות']"), vec!["חינוך", "בריאות"]);
    }

    #[test]
    fn test_strict_json_keeps_apostrophes() {
        assert_eq!(normalize_str("[\"O'Brien\"]"), vec!["O'Brien"]);
    }

    #[test]
    fn test_malformed_json_degrades_to_literal() {
        assert_eq!(normalize_str("[broken"), vec!["[broken"]);
    }

    #[test]
    fn test_numeric_scalar() {
        assert_eq!(normalize(Some(&json!(2021))), vec!["2021"]);
    }

    #[test]
    fn test_classify_shapes() {
        let list = json!(["a"]);
        assert!(matches!(FieldValue::classify(Some(&list)), FieldValue::List(_)));
        let encoded = json!("  [\"a\"]");
        assert!(matches!(FieldValue::classify(Some(&encoded)), FieldValue::JsonString(_)));
        let csv = json!("a,b");
        assert!(matches!(FieldValue::classify(Some(&csv)), FieldValue::CsvString(_)));
        let plain = json!("a");
        assert_eq!(FieldValue::classify(Some(&plain)), FieldValue::Scalar("a".to_string()));
    }
}
