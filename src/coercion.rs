//! Field coercion module
//!
//! Best-effort conversion of XML text content into typed field values.
//! None of these functions fail: unparseable text yields the sentinel the
//! caller declares for the field, so a single broken field never rejects
//! a whole record.

use chrono::{NaiveDate, NaiveDateTime};

/// Value of date fields that were absent or unparseable
pub const DATE_UNSET: NaiveDateTime = NaiveDateTime::MIN;

/// Date formats accepted by [`parse_date`], tried in order
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a 32-bit integer, returning `sentinel` when the text is not a number
///
/// Surrounding whitespace and a leading sign are accepted.
pub fn parse_int(text: &str, sentinel: i32) -> i32 {
    text.trim().parse().unwrap_or(sentinel)
}

/// Parses a 64-bit integer, returning `sentinel` when the text is not a number
pub fn parse_long(text: &str, sentinel: i64) -> i64 {
    text.trim().parse().unwrap_or(sentinel)
}

/// Parses a decimal number with `.` as decimal separator
///
/// Parsing never depends on the host locale. Non-finite results
/// ("NaN", "inf") are treated as unparseable and yield `sentinel`.
pub fn parse_double(text: &str, sentinel: f64) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => sentinel,
    }
}

/// Parses a boolean spelled `true` or `false` in any letter case
///
/// Everything else, including `1` and `0`, is false.
pub fn parse_bool(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// Parses a numeric flag: any integer greater than zero is true
pub fn parse_flag(text: &str) -> bool {
    parse_int(text, 0) > 0
}

/// Parses a date as `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`
///
/// Returns `None` for empty or unparseable text, so callers can leave the
/// field at its current value instead of overwriting it.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Converts pipe-delimited list text into comma-separated display text
///
/// `"|Comedy|Crime|Drama|"` becomes `"Comedy, Crime, Drama"`. Text without
/// a pipe is returned unchanged. Empty input, or input that collapses to
/// nothing, yields `None`.
pub fn normalize_list(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    if !text.contains('|') {
        return Some(text.to_string());
    }

    let mut result = text.replace('|', ", ");

    if result.starts_with(", ") {
        result = result[1..].trim().to_string();
    }

    result.truncate(result.trim_end().len());
    if result.ends_with(',') {
        result.truncate(result.len() - 1);
        result = result.trim().to_string();
    }

    if result.is_empty() { None } else { Some(result) }
}
