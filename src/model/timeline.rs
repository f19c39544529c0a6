//! Calendar-date parsing and chronological ordering of timeline blocks

use super::result::TimelineBlock;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Day-level formats the service has been seen to emit.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a calendar date leniently.
///
/// Accepts ISO dates and datetimes, RFC 3339, US slash dates, written-out
/// month names (full or abbreviated), `YYYY-MM` (first of the month) and a
/// bare year (January 1st). A range such as `2025-01-03 to 2025-01-05`
/// resolves to its start date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_exact(text) {
        return Some(date);
    }

    // Ranges and annotated dates: try the leading ISO date.
    text.get(..10).and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn parse_exact(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    // YYYY-MM
    if text.len() == 7 && text.as_bytes()[4] == b'-' {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d") {
            return Some(date);
        }
    }

    // YYYY
    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        return text.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

/// Stable ascending sort; undated blocks go last in input order.
pub(crate) fn sort_blocks(blocks: &[TimelineBlock]) -> Vec<&TimelineBlock> {
    let mut keyed: Vec<(Option<NaiveDate>, &TimelineBlock)> = blocks
        .iter()
        .map(|block| (parse_calendar_date(&block.date), block))
        .collect();

    // `sort_by` is stable, so equal keys keep their relative order.
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    keyed.into_iter().map(|(_, block)| block).collect()
}
