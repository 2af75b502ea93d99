//! Scraped requester CSV input.

use crate::domain::DocRecord;
use crate::extract::RequesterRow;
use crate::utils::read_text_with_fallback;
use anyhow::{Context, Result};
use globset::Glob;
use std::path::{Path, PathBuf};

/// Pick the lexicographically last file in `dir` whose name matches `pattern`.
///
/// Scrape exports carry a sortable timestamp in their name, so the last one is
/// the newest.
pub fn find_latest_input(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    let matcher = Glob::new(pattern)
        .with_context(|| format!("Invalid input pattern '{pattern}'"))?
        .compile_matcher();

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.file_name().map(|name| matcher.is_match(name)).unwrap_or(false))
        .collect();

    candidates.sort();
    Ok(candidates.pop())
}

/// Read the requester CSV into records, one per row.
///
/// Returns the records and the encoding the file was decoded with.
pub fn read_requester_csv(path: &Path, fallback_encoding: &str) -> Result<(Vec<DocRecord>, String)> {
    let (text, encoding) = read_text_with_fallback(path, fallback_encoding)?;
    let records = parse_requester_csv(&text)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
    Ok((records, encoding))
}

pub fn parse_requester_csv(text: &str) -> Result<Vec<DocRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RequesterRow>().enumerate() {
        let row = row.with_context(|| format!("Invalid CSV row {}", index + 2))?;
        records.push(row.into_record(index));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = "date,title,link,author,additional_authors,teamleader,requested_by_normalized
2021-03-01,דוח תקציב,https://example.org/1,רות,\"אבי, בתיה\",גדי,ועדת הכספים
2022-07-15,סקירה,https://example.org/2,רות,,,מרכז המחקר והמידע
,ללא תאריך,,,,,ועדת הכספים
";

    #[test]
    fn test_parse_requester_csv() {
        let records = parse_requester_csv(SAMPLE).expect("parse");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].authors, vec!["רות", "אבי", "בתיה"]);
        assert_eq!(records[0].team_leads, vec!["גדי"]);
        assert_eq!(records[0].year, Some(2021));
        assert_eq!(records[1].requester.as_deref(), Some("מרכז המחקר והמידע"));
        assert!(records[1].team_leads.is_empty());
        assert_eq!(records[2].year, None);
    }

    #[test]
    fn test_missing_columns_default_to_empty() {
        let records = parse_requester_csv("date,title\n2020-01-01,x\n").expect("parse");
        assert_eq!(records.len(), 1);
        assert!(records[0].requester.is_none());
        assert!(records[0].authors.is_empty());
    }

    #[test]
    fn test_find_latest_input() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("scrape_docs_2024-01-01.csv"), "").expect("write");
        fs::write(tmp.path().join("scrape_docs_2024-06-30.csv"), "").expect("write");
        fs::write(tmp.path().join("other.csv"), "").expect("write");

        let latest = find_latest_input(tmp.path(), "scrape_docs_*.csv").expect("find");
        assert_eq!(latest, Some(tmp.path().join("scrape_docs_2024-06-30.csv")));
    }

    #[test]
    fn test_find_latest_input_none() {
        let tmp = TempDir::new().expect("tmp");
        assert_eq!(find_latest_input(tmp.path(), "scrape_docs_*.csv").expect("find"), None);
    }

    #[test]
    fn test_read_requester_csv_windows_1255() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("scrape_docs_1.csv");
        let (bytes, _, _) = encoding_rs::WINDOWS_1255.encode(SAMPLE);
        fs::write(&path, &bytes).expect("write");

        let (records, encoding) = read_requester_csv(&path, "windows-1255").expect("read");
        assert_eq!(encoding, "windows-1255");
        assert_eq!(records[0].requester.as_deref(), Some("ועדת הכספים"));
    }
}
