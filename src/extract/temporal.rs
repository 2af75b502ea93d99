//! Year and date extraction from document metadata.

use chrono::{Duration, NaiveDate};
use serde_json::{Map, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve a document's year.
///
/// An explicit year field wins; otherwise the first four characters of the
/// date field are read as the year.
pub fn extract_year(meta: &Map<String, Value>, year_field: &str, date_field: &str) -> Option<i32> {
    if let Some(year) = meta.get(year_field).and_then(year_value) {
        return Some(year);
    }

    meta.get(date_field).and_then(Value::as_str).and_then(year_from_date_str)
}

/// Read the leading `YYYY` of a date string.
pub fn year_from_date_str(date: &str) -> Option<i32> {
    let prefix: String = date.chars().take(4).collect();
    if prefix.chars().count() < 4 {
        return None;
    }
    prefix.parse::<i32>().ok().filter(|y| *y > 0)
}

/// Parse a strict `YYYY-MM-DD` date. Anything else yields `None`.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Whether `latest` falls inside the recency window ending at `today`.
///
/// The boundary day (`today - window_days`) counts as active. A window reaching
/// past the calendar's range covers every date.
pub fn is_recent(latest: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> bool {
    let Some(date) = latest else {
        return false;
    };
    match Duration::try_days(window_days).and_then(|window| today.checked_sub_signed(window)) {
        Some(cutoff) => date >= cutoff,
        None => window_days > 0,
    }
}

fn year_value(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(year).ok().filter(|y| *y > 0)
}
