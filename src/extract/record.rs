//! Conversion of raw inputs (API documents, CSV rows) into [`DocRecord`]s.

use crate::domain::{Config, DocRecord, Document};
use crate::extract::field::normalize;
use crate::extract::temporal::{extract_year, parse_date};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use serde_json::Value;

/// Metadata keys used when reading API documents.
#[derive(Debug, Clone)]
pub struct MetadataFields {
    pub people: String,
    pub keywords: String,
    pub year: String,
    pub date: String,
    pub title: String,
    pub url: String,
}

impl From<&Config> for MetadataFields {
    fn from(config: &Config) -> Self {
        Self {
            people: config.people_field.clone(),
            keywords: config.keywords_field.clone(),
            year: config.year_field.clone(),
            date: config.date_field.clone(),
            title: config.title_field.clone(),
            url: config.url_field.clone(),
        }
    }
}

impl Default for MetadataFields {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub fn record_from_document(doc: &Document, fields: &MetadataFields) -> DocRecord {
    let meta = &doc.metadata;
    let date = meta.get(&fields.date).and_then(Value::as_str).map(str::to_string);
    let parsed_date = date.as_deref().and_then(parse_date);

    let title = meta
        .get(&fields.title)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(doc.id.as_str())
        .to_string();
    let url = meta.get(&fields.url).and_then(Value::as_str).unwrap_or_default().to_string();

    DocRecord {
        id: doc.id.clone(),
        title,
        url,
        year: extract_year(meta, &fields.year, &fields.date),
        date,
        parsed_date,
        authors: normalize(meta.get(&fields.people)),
        team_leads: Vec::new(),
        keywords: normalize(meta.get(&fields.keywords)),
        requester: None,
    }
}

/// One row of the scraped requester CSV.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequesterRow {
    pub date: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
    pub additional_authors: Option<String>,
    pub teamleader: Option<String>,
    pub requested_by_normalized: Option<String>,
}

impl RequesterRow {
    pub fn into_record(self, row_index: usize) -> DocRecord {
        let date = present(self.date);
        let parsed_date = date.as_deref().and_then(parse_csv_date);
        let year = parsed_date.map(|d| chrono::Datelike::year(&d));

        let mut authors: Vec<String> = present(self.author).into_iter().collect();
        if let Some(extra) = present(self.additional_authors) {
            authors.extend(parse_quoted_list(&extra).into_iter().filter(|a| !is_nan(a)));
        }

        DocRecord {
            id: format!("row-{}", row_index + 1),
            title: present(self.title).unwrap_or_default(),
            url: present(self.link).unwrap_or_default(),
            date,
            parsed_date,
            year,
            authors,
            team_leads: present(self.teamleader).into_iter().collect(),
            keywords: Vec::new(),
            requester: present(self.requested_by_normalized),
        }
    }
}

/// Split a CSV-quoted list such as `a, "b, c", d` into its trimmed items.
pub fn parse_quoted_list(text: &str) -> Vec<String> {
    let text = skip_initial_space(text);
    let mut reader =
        ReaderBuilder::new().has_headers(false).trim(Trim::All).from_reader(text.as_bytes());
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record
            .iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

// Drop whitespace at the start of each unquoted field so a quote after `, `
// still opens a quoted field.
fn skip_initial_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut field_start = true;
    for c in text.chars() {
        if field_start && !in_quotes && c.is_whitespace() {
            continue;
        }
        field_start = false;
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => field_start = true,
            _ => {}
        }
        out.push(c);
    }
    out
}

// Scraped dates sometimes carry a time component after the day.
fn parse_csv_date(date: &str) -> Option<chrono::NaiveDate> {
    let trimmed = date.trim();
    parse_date(trimmed).or_else(|| {
        trimmed.split(|c: char| c == ' ' || c == 'T').next().and_then(parse_date)
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty() && !is_nan(v))
}

fn is_nan(value: &str) -> bool {
    value.eq_ignore_ascii_case("nan")
}
