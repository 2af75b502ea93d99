//! Per-entity running aggregates over normalized document records.
//!
//! Authors, topics and requesters are all aggregated by the same routine:
//! an extractor picks the participant names out of each record, and
//! [`AggregateOptions`] decides how each participant is weighted and whether
//! per-document detail is kept.

use crate::domain::{DocRecord, DocSummary};
use crate::extract::{is_recent, parse_date};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub mod cooccurrence;
pub mod requester;

pub use cooccurrence::{count_pairs, PairCount};
pub use requester::{analyze_requesters, RequesterReport, RequesterSummary, RequesterType};

/// How a document's credit is shared between its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Every participant gets a full point.
    #[default]
    Unit,
    /// N participants get 1/N each, so co-authored documents do not inflate
    /// individual productivity.
    EqualSplit,
}

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub weighting: Weighting,
    /// Keep document summaries, co-participant sets and per-year counts.
    pub retain_details: bool,
    /// Names with fewer characters than this are dropped as noise.
    pub min_name_chars: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self { weighting: Weighting::Unit, retain_details: false, min_name_chars: 1 }
    }
}

/// Running statistics for one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStats {
    pub count: u64,
    pub weighted_count: f64,
    pub years: BTreeSet<i32>,
    pub latest_date: Option<NaiveDate>,
    pub authors: BTreeSet<String>,
    pub team_leads: BTreeSet<String>,
    pub year_counts: BTreeMap<i32, u64>,
    pub documents: Vec<DocSummary>,
}

impl EntityStats {
    fn record(&mut self, doc: &DocRecord, weight: f64, retain_details: bool) {
        self.count += 1;
        self.weighted_count += weight;

        if let Some(year) = doc.year {
            self.years.insert(year);
        }
        if let Some(date) = doc.parsed_date {
            if self.latest_date.map_or(true, |current| date > current) {
                self.latest_date = Some(date);
            }
        }

        if retain_details {
            self.authors.extend(doc.authors.iter().cloned());
            self.team_leads.extend(doc.team_leads.iter().cloned());
            if let Some(year) = doc.year {
                *self.year_counts.entry(year).or_insert(0) += 1;
            }
            self.documents.push(doc.summary());
        }
    }

    pub fn min_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn max_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// `""` with no years, `"2021"` for a single year, else `"2020-2023"`.
    pub fn years_range(&self) -> String {
        match (self.min_year(), self.max_year()) {
            (Some(min), Some(max)) if min == max => min.to_string(),
            (Some(min), Some(max)) => format!("{min}-{max}"),
            _ => String::new(),
        }
    }

    /// Inclusive year span; 1 when no year is known.
    pub fn span_years(&self) -> u32 {
        match (self.min_year(), self.max_year()) {
            (Some(min), Some(max)) => (max - min + 1).max(1) as u32,
            _ => 1,
        }
    }

    pub fn avg_per_year(&self, weighting: Weighting) -> f64 {
        let total = match weighting {
            Weighting::Unit => self.count as f64,
            Weighting::EqualSplit => self.weighted_count,
        };
        round_to(total / f64::from(self.span_years()), 1)
    }

    pub fn is_active(&self, today: NaiveDate, window_days: i64) -> bool {
        is_recent(self.latest_date, today, window_days)
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub entities: BTreeMap<String, EntityStats>,
    pub weighting: Weighting,
    /// Records that yielded no participant.
    pub skipped: usize,
}

impl Aggregation {
    pub fn get(&self, name: &str) -> Option<&EntityStats> {
        self.entities.get(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities ordered by count (descending), then name.
    pub fn by_count(&self) -> Vec<(&String, &EntityStats)> {
        let mut ranked: Vec<_> = self.entities.iter().collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Fold `records` into per-entity statistics.
pub fn aggregate<F>(records: &[DocRecord], extract: F, options: &AggregateOptions) -> Aggregation
where
    F: Fn(&DocRecord) -> Vec<String>,
{
    let mut result = Aggregation { weighting: options.weighting, ..Aggregation::default() };

    for doc in records {
        let participants = clean_names(extract(doc), options.min_name_chars);
        if participants.is_empty() {
            result.skipped += 1;
            continue;
        }

        let weight = match options.weighting {
            Weighting::Unit => 1.0,
            Weighting::EqualSplit => 1.0 / participants.len() as f64,
        };

        for name in participants {
            result.entities.entry(name).or_default().record(doc, weight, options.retain_details);
        }
    }

    for stats in result.entities.values_mut() {
        sort_documents_by_date(&mut stats.documents);
    }

    tracing::debug!(
        entities = result.entities.len(),
        skipped = result.skipped,
        "aggregation complete"
    );
    result
}

pub fn authors_of(doc: &DocRecord) -> Vec<String> {
    doc.authors.clone()
}

pub fn keywords_of(doc: &DocRecord) -> Vec<String> {
    doc.keywords.clone()
}

pub fn requester_of(doc: &DocRecord) -> Vec<String> {
    doc.requester.iter().cloned().collect()
}

/// Trim, drop short names, and dedupe while keeping first-seen order.
pub fn clean_names(names: Vec<String>, min_chars: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && n.chars().count() >= min_chars)
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// Newest first; undated documents last. Stable, so ties keep encounter order.
pub fn sort_documents_by_date(documents: &mut [DocSummary]) {
    documents.sort_by(|a, b| parse_date(&b.date).cmp(&parse_date(&a.date)));
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
