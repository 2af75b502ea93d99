//! JSON snapshot generation (`authors_data.json`, `topics_data.json`).

use crate::aggregate::{round_to, Aggregation, EntityStats, PairCount};
use crate::domain::DocSummary;
use crate::utils::corpus_fingerprint;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fields shared by every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub updated_at: String,
    pub data_version: String,
    pub total_docs: usize,
    #[serde(default)]
    pub skipped_docs: usize,
}

impl SnapshotHeader {
    pub fn new<'a, I>(doc_ids: I, total_docs: usize, skipped_docs: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            updated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            data_version: corpus_fingerprint(doc_ids),
            total_docs,
            skipped_docs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub value: String,
    pub count: u64,
    pub weighted_count: f64,
    pub years_range: String,
    pub span_years: u32,
    pub avg_per_year: f64,
    pub is_active: bool,
    pub latest_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub value: String,
    pub count: u64,
    pub years_range: String,
    pub span_years: u32,
    pub avg_per_year: f64,
    pub is_active: bool,
    pub latest_date: Option<String>,
    pub authors: Vec<String>,
    pub documents: Vec<DocSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorsSnapshot {
    #[serde(flatten)]
    pub header: SnapshotHeader,
    pub authors: Vec<AuthorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicsSnapshot {
    #[serde(flatten)]
    pub header: SnapshotHeader,
    pub topics: Vec<TopicEntry>,
    pub pairs: Vec<PairCount>,
}

/// Author entries sorted by name.
pub fn author_entries(agg: &Aggregation, today: NaiveDate, recency_days: i64) -> Vec<AuthorEntry> {
    agg.entities
        .iter()
        .map(|(name, stats)| AuthorEntry {
            value: name.clone(),
            count: stats.count,
            weighted_count: round_to(stats.weighted_count, 2),
            years_range: stats.years_range(),
            span_years: stats.span_years(),
            avg_per_year: stats.avg_per_year(agg.weighting),
            is_active: stats.is_active(today, recency_days),
            latest_date: format_date(stats),
        })
        .collect()
}

/// Topic entries, most frequent first.
pub fn topic_entries(agg: &Aggregation, today: NaiveDate, recency_days: i64) -> Vec<TopicEntry> {
    agg.by_count()
        .into_iter()
        .map(|(name, stats)| TopicEntry {
            value: name.clone(),
            count: stats.count,
            years_range: stats.years_range(),
            span_years: stats.span_years(),
            avg_per_year: stats.avg_per_year(agg.weighting),
            is_active: stats.is_active(today, recency_days),
            latest_date: format_date(stats),
            authors: stats.authors.iter().cloned().collect(),
            documents: stats.documents.clone(),
        })
        .collect()
}

/// Write `snapshot` as pretty UTF-8 JSON, replacing any existing file.
pub fn write_snapshot<T: Serialize>(path: &Path, snapshot: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let body = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid snapshot: {}", path.display()))
}

fn format_date(stats: &EntityStats) -> Option<String> {
    stats.latest_date.map(|d| d.format("%Y-%m-%d").to_string())
}
