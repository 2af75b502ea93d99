//! Requester analysis: type classification, per-requester table rows and
//! yearly category shares.

use super::{aggregate, requester_of, round_to, AggregateOptions, Aggregation, EntityStats, Weighting};
use crate::domain::DocRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

const RESEARCH_CENTER: &str = "מרכז המחקר והמידע";
const LEGAL_COUNSEL: &str = "הייעוץ המשפטי לכנסת";
const COMMITTEE_PREFIXES: &[&str] = &["הוועדה", "ועדת"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RequesterType {
    ResearchCenter,
    Committees,
    MembersAndOthers,
}

impl RequesterType {
    pub const ALL: [RequesterType; 3] =
        [RequesterType::ResearchCenter, RequesterType::Committees, RequesterType::MembersAndOthers];

    /// Classify a normalized requester name. Rules are checked in order.
    pub fn classify(name: &str) -> Self {
        if name.contains(RESEARCH_CENTER) {
            RequesterType::ResearchCenter
        } else if name.contains(LEGAL_COUNSEL) {
            RequesterType::MembersAndOthers
        } else if COMMITTEE_PREFIXES.iter().any(|p| name.starts_with(p)) {
            RequesterType::Committees
        } else {
            RequesterType::MembersAndOthers
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequesterType::ResearchCenter => "מרכז המחקר והמידע",
            RequesterType::Committees => "ועדות",
            RequesterType::MembersAndOthers => "חברי כנסת ואחרים",
        }
    }
}

/// One row of the requester table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequesterSummary {
    pub name: String,
    pub kind: RequesterType,
    pub doc_count: u64,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub years_range: String,
    pub span_years: u32,
    pub active_years: usize,
    pub avg_per_year: f64,
    pub authors: Vec<String>,
    pub team_leads: Vec<String>,
    pub avg_per_author: f64,
}

impl RequesterSummary {
    pub fn distinct_authors(&self) -> usize {
        self.authors.len()
    }

    pub fn distinct_team_leads(&self) -> usize {
        self.team_leads.len()
    }
}

/// Share of documents per requester type in one year, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearShare {
    pub year: i32,
    pub total: u64,
    pub research_center: f64,
    pub committees: f64,
    pub others: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DetailDoc {
    pub date: String,
    pub title: String,
    pub link: String,
}

/// Drill-down data for one requester.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequesterDetails {
    pub years: BTreeMap<i32, u64>,
    pub docs: Vec<DetailDoc>,
}

#[derive(Debug, Clone, Default)]
pub struct RequesterReport {
    pub rows: Vec<RequesterSummary>,
    pub yearly: Vec<YearShare>,
    pub unique_counts: BTreeMap<RequesterType, usize>,
    pub details: BTreeMap<String, RequesterDetails>,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub skipped_no_date: usize,
    pub skipped_no_requester: usize,
    pub first_date: Option<chrono::NaiveDate>,
    pub last_date: Option<chrono::NaiveDate>,
}

impl RequesterReport {
    pub fn unique_count(&self, kind: RequesterType) -> usize {
        self.unique_counts.get(&kind).copied().unwrap_or(0)
    }
}

pub fn analyze_requesters(records: &[DocRecord]) -> RequesterReport {
    let mut report = RequesterReport { total_rows: records.len(), ..RequesterReport::default() };

    let dates = records.iter().filter_map(|r| r.parsed_date);
    report.first_date = dates.clone().min();
    report.last_date = dates.max();

    let mut valid: Vec<DocRecord> = Vec::with_capacity(records.len());
    for record in records {
        if record.year.is_none() {
            report.skipped_no_date += 1;
            continue;
        }
        if record.requester.is_none() {
            report.skipped_no_requester += 1;
            continue;
        }
        valid.push(record.clone());
    }
    report.valid_rows = valid.len();

    let options =
        AggregateOptions { weighting: Weighting::Unit, retain_details: true, min_name_chars: 1 };
    let aggregation = aggregate(&valid, requester_of, &options);

    let mut rows: Vec<RequesterSummary> = aggregation
        .entities
        .iter()
        .map(|(name, stats)| {
            let authors: Vec<String> = stats.authors.iter().cloned().collect();
            let avg_per_author = if authors.is_empty() {
                0.0
            } else {
                round_to(stats.count as f64 / authors.len() as f64, 1)
            };
            RequesterSummary {
                name: name.clone(),
                kind: RequesterType::classify(name),
                doc_count: stats.count,
                first_year: stats.min_year(),
                last_year: stats.max_year(),
                years_range: stats.years_range(),
                span_years: stats.span_years(),
                active_years: stats.years.len(),
                avg_per_year: stats.avg_per_year(Weighting::Unit),
                authors,
                team_leads: stats.team_leads.iter().cloned().collect(),
                avg_per_author,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.doc_count.cmp(&a.doc_count).then_with(|| a.name.cmp(&b.name)));

    for row in &rows {
        *report.unique_counts.entry(row.kind).or_insert(0) += 1;
    }

    report.yearly = yearly_shares(&aggregation);
    report.details = aggregation
        .entities
        .iter()
        .map(|(name, stats)| (name.clone(), requester_details(stats)))
        .collect();
    report.rows = rows;
    report
}

fn yearly_shares(aggregation: &Aggregation) -> Vec<YearShare> {
    let mut per_year: BTreeMap<i32, BTreeMap<RequesterType, u64>> = BTreeMap::new();
    for (name, stats) in &aggregation.entities {
        let kind = RequesterType::classify(name);
        for (year, count) in &stats.year_counts {
            *per_year.entry(*year).or_default().entry(kind).or_insert(0) += count;
        }
    }

    per_year
        .into_iter()
        .map(|(year, counts)| {
            let total: u64 = counts.values().sum();
            let share = |kind: RequesterType| {
                let n = counts.get(&kind).copied().unwrap_or(0);
                if total == 0 {
                    0.0
                } else {
                    round_to(n as f64 / total as f64 * 100.0, 1)
                }
            };
            YearShare {
                year,
                total,
                research_center: share(RequesterType::ResearchCenter),
                committees: share(RequesterType::Committees),
                others: share(RequesterType::MembersAndOthers),
            }
        })
        .collect()
}

/// Drill-down view of one requester's retained details. Repeated documents are listed once.
fn requester_details(stats: &EntityStats) -> RequesterDetails {
    let mut seen: HashSet<DetailDoc> = HashSet::new();
    let docs = stats
        .documents
        .iter()
        .map(|doc| DetailDoc { date: doc.date.clone(), title: doc.title.clone(), link: doc.url.clone() })
        .filter(|doc| seen.insert(doc.clone()))
        .collect();
    RequesterDetails { years: stats.year_counts.clone(), docs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_date;

    fn row(requester: Option<&str>, date: Option<&str>, authors: &[&str], lead: &[&str]) -> DocRecord {
        let parsed = date.and_then(parse_date);
        DocRecord {
            id: format!("{requester:?}{date:?}"),
            title: format!("מסמך {}", date.unwrap_or("-")),
            url: "https://example.org".to_string(),
            date: date.map(str::to_string),
            parsed_date: parsed,
            year: parsed.map(|d| chrono::Datelike::year(&d)),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            team_leads: lead.iter().map(|a| a.to_string()).collect(),
            keywords: Vec::new(),
            requester: requester.map(str::to_string),
        }
    }

    #[test]
    fn test_research_center_wins_over_other_rules() {
        assert_eq!(
            RequesterType::classify("ועדת החינוך באמצעות מרכז המחקר והמידע"),
            RequesterType::ResearchCenter
        );
        assert_eq!(
            RequesterType::classify("הייעוץ המשפטי לכנסת ומרכז המחקר והמידע"),
            RequesterType::ResearchCenter
        );
    }

    #[test]
    fn test_committee_prefixes() {
        assert_eq!(RequesterType::classify("ועדת הכספים"), RequesterType::Committees);
        assert_eq!(RequesterType::classify("הוועדה לביקורת המדינה"), RequesterType::Committees);
    }

    #[test]
    fn test_legal_counsel_and_default() {
        assert_eq!(
            RequesterType::classify("הייעוץ המשפטי לכנסת - ועדת החוקה"),
            RequesterType::MembersAndOthers
        );
        assert_eq!(RequesterType::classify("חה\"כ ישראל ישראלי"), RequesterType::MembersAndOthers);
        assert_eq!(RequesterType::classify(""), RequesterType::MembersAndOthers);
    }

    #[test]
    fn test_analyze_requesters() {
        let records = vec![
            row(Some("ועדת הכספים"), Some("2020-01-05"), &["אבי", "בתיה"], &["גדי"]),
            row(Some("ועדת הכספים"), Some("2022-03-01"), &["אבי"], &[]),
            row(Some("מרכז המחקר והמידע"), Some("2022-04-01"), &[], &[]),
            row(None, Some("2022-05-01"), &["אבי"], &[]),
            row(Some("ועדת הכספים"), None, &["אבי"], &[]),
        ];
        let report = analyze_requesters(&records);

        assert_eq!(report.total_rows, 5);
        assert_eq!(report.valid_rows, 3);
        assert_eq!(report.skipped_no_requester, 1);
        assert_eq!(report.skipped_no_date, 1);
        assert_eq!(report.first_date, parse_date("2020-01-05"));
        assert_eq!(report.last_date, parse_date("2022-05-01"));

        let finance = &report.rows[0];
        assert_eq!(finance.name, "ועדת הכספים");
        assert_eq!(finance.kind, RequesterType::Committees);
        assert_eq!(finance.doc_count, 2);
        assert_eq!(finance.years_range, "2020-2022");
        assert_eq!(finance.span_years, 3);
        assert_eq!(finance.active_years, 2);
        assert_eq!(finance.avg_per_year, 0.7);
        assert_eq!(finance.distinct_authors(), 2);
        assert_eq!(finance.distinct_team_leads(), 1);
        assert_eq!(finance.avg_per_author, 1.0);

        let center = &report.rows[1];
        assert_eq!(center.kind, RequesterType::ResearchCenter);
        assert_eq!(center.avg_per_author, 0.0);

        assert_eq!(report.unique_count(RequesterType::Committees), 1);
        assert_eq!(report.unique_count(RequesterType::ResearchCenter), 1);
        assert_eq!(report.unique_count(RequesterType::MembersAndOthers), 0);

        assert_eq!(report.yearly.len(), 2);
        assert_eq!(report.yearly[1].year, 2022);
        assert_eq!(report.yearly[1].committees, 50.0);
        assert_eq!(report.yearly[1].research_center, 50.0);
        assert_eq!(report.yearly[0].committees, 100.0);

        let details = &report.details["ועדת הכספים"];
        assert_eq!(details.years.get(&2020), Some(&1));
        assert_eq!(details.docs.len(), 2);
    }

    #[test]
    fn test_duplicate_detail_docs_collapsed() {
        let records = vec![
            row(Some("ועדת הכספים"), Some("2021-01-01"), &[], &[]),
            row(Some("ועדת הכספים"), Some("2021-01-01"), &[], &[]),
        ];
        let report = analyze_requesters(&records);
        assert_eq!(report.rows[0].doc_count, 2);
        assert_eq!(report.details["ועדת הכספים"].docs.len(), 1);
        assert_eq!(report.details["ועדת הכספים"].years[&2021], 2);
    }

    #[test]
    fn test_details_follow_aggregated_counts() {
        let records = vec![
            row(Some("ועדת הכספים"), Some("2020-01-05"), &["אבי"], &[]),
            row(Some("ועדת הכספים"), Some("2022-03-01"), &[], &[]),
            row(Some("ועדת הכספים"), Some("2022-06-01"), &[], &[]),
            row(Some("מרכז המחקר והמידע"), Some("2022-04-01"), &[], &[]),
        ];
        let report = analyze_requesters(&records);

        let details = &report.details["ועדת הכספים"];
        assert_eq!(details.years, BTreeMap::from([(2020, 1), (2022, 2)]));
        let dates: Vec<&str> = details.docs.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2022-06-01", "2022-03-01", "2020-01-05"]);

        let total: u64 = report.yearly.iter().map(|y| y.total).sum();
        assert_eq!(total, report.valid_rows as u64);
        assert_eq!(report.yearly[1].committees, 66.7);
        assert_eq!(report.yearly[1].research_center, 33.3);
    }
}
