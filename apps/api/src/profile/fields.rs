//! Field coercion shared by the extraction parser and the section editors.
//!
//! Each function turns one JSON value into one field type. The parser treats
//! an `Err` as "keep the field default"; the editors surface it to the caller.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use thiserror::Error;
use url::Url;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Words the extraction service uses for an open-ended range ("2021 - Present").
const OPEN_ENDED: &[&str] = &["present", "current", "currently", "ongoing", "now", "till date"];

#[derive(Debug, Clone, Error, PartialEq)]
#[error("expected {expected}, got {found}")]
pub struct CoerceError {
    pub expected: &'static str,
    pub found: String,
}

fn mismatch(expected: &'static str, value: &Value) -> CoerceError {
    let found = match value {
        Value::String(s) if s.chars().count() > 40 => {
            format!("\"{}...\"", s.chars().take(40).collect::<String>())
        }
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
        other => other.to_string(),
    };
    CoerceError { expected, found }
}

/// A closed set of canonical names, matched loosely.
pub trait Choice: Copy + Default + 'static {
    /// Human-readable list of accepted values, used in error messages.
    const EXPECTED: &'static str;
    /// Canonical names first, then any accepted aliases.
    const NAMES: &'static [(&'static str, Self)];
}

/// Lowercases and strips everything but letters and digits, so that
/// "On-Site", "on_site" and "ONSITE" compare equal.
pub fn canonical_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn choice<T: Choice>(value: &Value) -> Result<T, CoerceError> {
    let Value::String(s) = value else {
        return Err(mismatch(T::EXPECTED, value));
    };
    let key = canonical_key(s);
    if key.is_empty() {
        return Err(mismatch(T::EXPECTED, value));
    }
    T::NAMES
        .iter()
        .find(|(name, _)| canonical_key(name) == key)
        .map(|(_, variant)| *variant)
        .ok_or_else(|| mismatch(T::EXPECTED, value))
}

pub fn text(value: &Value) -> Result<String, CoerceError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(mismatch("text", value)),
    }
}

/// Like [`text`], but an empty result is `None`.
pub fn optional_text(value: &Value) -> Result<Option<String>, CoerceError> {
    text(value).map(|s| (!s.is_empty()).then_some(s))
}

pub fn flag(value: &Value) -> Result<bool, CoerceError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(mismatch("boolean", value)),
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(true),
            "false" | "no" | "n" | "0" | "" => Ok(false),
            _ => Err(mismatch("boolean", value)),
        },
        _ => Err(mismatch("boolean", value)),
    }
}

fn is_open_ended(s: &str) -> bool {
    let lower = s.to_lowercase();
    OPEN_ENDED.contains(&lower.as_str())
}

fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// First run of exactly four ASCII digits, e.g. "Aug 2021" -> 2021.
fn leading_year(s: &str) -> Option<i32> {
    let bytes = s.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |offset| start + offset);
        if end - start == 4 {
            return s[start..end].parse().ok().filter(|y| year_in_range(*y));
        }
        start = end;
    }
    None
}

/// Integers, and floats with no fractional part (`2021.0`).
fn whole_number(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

pub fn year(value: &Value) -> Result<Option<i32>, CoerceError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => whole_number(n)
            .and_then(|y| i32::try_from(y).ok())
            .filter(|y| year_in_range(*y))
            .map(Some)
            .ok_or_else(|| mismatch("year", value)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || is_open_ended(s) {
                return Ok(None);
            }
            leading_year(s)
                .map(Some)
                .ok_or_else(|| mismatch("year", value))
        }
        _ => Err(mismatch("year", value)),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let full = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"));
    if let Ok(date) = full {
        return Some(date);
    }
    // Month precision resolves to the first of the month.
    let month = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("01/{s}"), "%d/%m/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("1 {s}"), "%d %B %Y"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("1 {s}"), "%d %b %Y"));
    if let Ok(date) = month {
        return Some(date);
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }
    None
}

pub fn date(value: &Value) -> Result<Option<NaiveDate>, CoerceError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => whole_number(n)
            .and_then(|y| i32::try_from(y).ok())
            .filter(|y| year_in_range(*y))
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .map(Some)
            .ok_or_else(|| mismatch("date", value)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || is_open_ended(s) {
                return Ok(None);
            }
            parse_date(s)
                .filter(|d| year_in_range(d.year()))
                .map(Some)
                .ok_or_else(|| mismatch("date (YYYY-MM-DD)", value))
        }
        _ => Err(mismatch("date (YYYY-MM-DD)", value)),
    }
}

/// CGPA, GPA or percentage. Takes the leading number of strings like "8.5/10" or "85%".
pub fn score(value: &Value) -> Result<Option<f64>, CoerceError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(Some)
            .ok_or_else(|| mismatch("score", value)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            let numeric: String = s
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            numeric
                .parse::<f64>()
                .ok()
                .map(Some)
                .ok_or_else(|| mismatch("score", value))
        }
        _ => Err(mismatch("score", value)),
    }
}

/// Absolute http(s) URL. Scheme-less links ("github.com/me/app") get `https://`.
pub fn link(value: &Value) -> Result<Option<String>, CoerceError> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim(),
        _ => return Err(mismatch("http(s) URL", value)),
    };
    if raw.is_empty() {
        return Ok(None);
    }
    let parsed = match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{raw}")).ok()
        }
        Err(_) => None,
    };
    parsed
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| url.host_str().is_some_and(|host| host.contains('.')))
        .map(|url| Some(String::from(url)))
        .ok_or_else(|| mismatch("http(s) URL", value))
}
