// src/freshness.rs
//! Publication-date handling shared by both scorers.
//!
//! Age is measured against an explicit reference time so scoring stays
//! deterministic. Three outcomes matter to callers:
//! - no date at all (absent or blank),
//! - a date that cannot be parsed,
//! - a parsed date with a fractional age in days (negative for future dates).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Age {
    Missing,
    Unparseable,
    Days(f64),
}

/// Parse the date formats seen from news feeds and LLM echoes.
/// Naive timestamps are taken as UTC.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(n.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

/// Age of `pub_date` relative to `now`.
pub fn age(pub_date: Option<&str>, now: DateTime<Utc>) -> Age {
    let Some(raw) = pub_date.filter(|s| !s.trim().is_empty()) else {
        return Age::Missing;
    };
    match parse_pub_date(raw) {
        Some(dt) => Age::Days((now - dt).num_milliseconds() as f64 / MS_PER_DAY),
        None => Age::Unparseable,
    }
}
