//! Date parsing for case fields.
//!
//! Strategies, first success wins:
//! 1. Spoken date ("december fifteen twenty twenty four")
//! 2. Numeric MM/DD/YYYY or MM-DD-YYYY, whole value
//! 3. Same numeric pattern anywhere in the value
//! 4. ISO-like YYYY-MM-DD or YYYY/MM/DD anywhere in the value
//! 5. Written calendar formats ("Dec 15, 2024", RFC 3339)
//!
//! A match that is not a real calendar date, or whose year falls outside
//! 1900-2100, moves on to the next strategy.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::spoken::{parse_spoken_date, SpokenForm, MAX_YEAR, MIN_YEAR};
use super::values::{NormalizeError, NormalizeResult};

static NUMERIC_STRICT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("valid strict date regex")
});

static NUMERIC_LOOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").expect("valid loose date regex")
});

static ISO_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})").expect("valid ISO date regex")
});

/// Written formats accepted as a last resort.
const FALLBACK_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%b. %d, %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
    "%Y.%m.%d",
    "%m.%d.%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Which strategy produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    Spoken(SpokenForm),
    NumericStrict,
    NumericLoose,
    IsoLike,
    Written,
}

/// Parse a date value, reporting the strategy that matched.
pub fn parse_date_detailed(value: &str) -> Option<(NaiveDate, DateStrategy)> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some((date, form)) = parse_spoken_date(value) {
        return Some((date, DateStrategy::Spoken(form)));
    }

    if let Some(date) = NUMERIC_STRICT
        .captures(value)
        .and_then(|caps| ymd(&caps[3], &caps[1], &caps[2]))
    {
        return Some((date, DateStrategy::NumericStrict));
    }

    if let Some(date) = NUMERIC_LOOSE
        .captures(value)
        .and_then(|caps| ymd(&caps[3], &caps[1], &caps[2]))
    {
        return Some((date, DateStrategy::NumericLoose));
    }

    if let Some(date) = ISO_LIKE
        .captures(value)
        .and_then(|caps| ymd(&caps[1], &caps[2], &caps[3]))
    {
        return Some((date, DateStrategy::IsoLike));
    }

    if let Some(date) = parse_written(value) {
        return Some((date, DateStrategy::Written));
    }

    debug!(value, "no date strategy matched");
    None
}

/// Parse a date value.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_date_detailed(value).map(|(date, _)| date)
}

/// Parse a date value, failing with a normalization error.
pub fn normalize_date(value: &str) -> NormalizeResult<NaiveDate> {
    if value.trim().is_empty() {
        return Err(NormalizeError::Empty);
    }
    parse_date(value).ok_or_else(|| NormalizeError::InvalidDate(value.trim().to_string()))
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
        .filter(in_year_range)
}

/// chrono's `%Y` also accepts one to three digit years ("March 2020" reads
/// as day 20 of year 20).
fn in_year_range(date: &NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

fn parse_written(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive()).filter(in_year_range);
    }

    FALLBACK_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(value, format).ok().map(|dt| dt.date()))
            .filter(in_year_range)
    })
}
