//! Date decoding and encoding for front matter values.
//!
//! Dates appear in documents in three historical encodings and are always
//! written back as a calendar date.
//!
//! # Supported Date Formats (Read)
//!
//! - **ISO date**: `"2025-03-23"`, interpreted as local midnight
//! - **Epoch string**: `"1647369160604"`, Unix milliseconds
//! - **Epoch number**: `1647369160604`, Unix milliseconds
//! - **RFC 3339**: `"2025-03-23T10:00:00+01:00"`, converted to local time
//!
//! Anything else decodes to the current time. The fallback is reported
//! through [`ParsedDate::Defaulted`] so callers can tell it apart from a
//! clean parse.
//!
//! # Example
//!
//! ```
//! use noteweave_core::date::{format_date, parse_date, DateInput};
//!
//! let parsed = parse_date(DateInput::Text("2025-03-23"));
//! assert!(parsed.is_exact());
//! assert_eq!(format_date(&parsed.value()), "2025-03-23");
//! ```

use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone};
use serde_yaml::Value;

use crate::error::{NoteweaveError, Result};

/// Raw date value as it appears in a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    /// A textual date (`YYYY-MM-DD`, digits, or RFC 3339).
    Text(&'a str),
    /// A numeric epoch-millisecond timestamp.
    Millis(i64),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        DateInput::Text(value)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(value: i64) -> Self {
        DateInput::Millis(value)
    }
}

/// Outcome of decoding a date.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDate {
    /// The input matched one of the accepted encodings.
    Exact(DateTime<Local>),
    /// The input was not recognized; `value` is the time of decoding.
    Defaulted {
        /// Fallback time
        value: DateTime<Local>,
        /// Why the input was rejected
        reason: String,
    },
}

impl ParsedDate {
    /// The decoded date, or the fallback time.
    pub fn value(&self) -> DateTime<Local> {
        match self {
            ParsedDate::Exact(value) | ParsedDate::Defaulted { value, .. } => *value,
        }
    }

    /// Whether the input decoded cleanly.
    pub fn is_exact(&self) -> bool {
        matches!(self, ParsedDate::Exact(_))
    }

    /// Convert into a strict result, turning the fallback into an error.
    pub fn into_strict(self) -> Result<DateTime<Local>> {
        match self {
            ParsedDate::Exact(value) => Ok(value),
            ParsedDate::Defaulted { reason, .. } => Err(NoteweaveError::InvalidDateFormat(reason)),
        }
    }
}

/// Decode a date from any accepted encoding, falling back to now.
pub fn parse_date<'a>(raw: impl Into<DateInput<'a>>) -> ParsedDate {
    match raw.into() {
        DateInput::Millis(ms) => from_millis(ms, &ms.to_string()),
        DateInput::Text(text) => parse_text(text.trim()),
    }
}

fn parse_text(text: &str) -> ParsedDate {
    // First try YYYY-MM-DD, anchored to local midnight
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return match local_midnight(date) {
            Some(value) => ParsedDate::Exact(value),
            None => defaulted(text),
        };
    }

    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return match text.parse::<i64>() {
            Ok(ms) => from_millis(ms, text),
            Err(_) => defaulted(text),
        };
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return ParsedDate::Exact(dt.with_timezone(&Local));
    }

    defaulted(text)
}

fn from_millis(ms: i64, raw: &str) -> ParsedDate {
    match Local.timestamp_millis_opt(ms) {
        LocalResult::Single(value) => ParsedDate::Exact(value),
        _ => defaulted(raw),
    }
}

fn defaulted(raw: &str) -> ParsedDate {
    log::debug!("Unrecognized date '{}', using current time", raw);
    ParsedDate::Defaulted {
        value: Local::now(),
        reason: raw.to_string(),
    }
}

/// Local midnight of a calendar date.
///
/// On days where midnight does not exist (DST gaps) the earliest valid
/// instant of the day is used.
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let one_am = date.and_hms_opt(1, 0, 0)?;
            Local.from_local_datetime(&one_am).earliest()
        }
    }
}

/// Decode a date from a YAML scalar.
///
/// Strings and integers follow [`parse_date`]; any other value falls back
/// to now.
pub fn parse_date_value(value: &Value) -> ParsedDate {
    match value {
        Value::String(s) => parse_date(s.as_str()),
        Value::Number(n) => match n.as_i64() {
            Some(ms) => parse_date(ms),
            // Floats from hand-edited files are truncated to whole milliseconds
            None => match n.as_f64() {
                Some(f) if f.is_finite() => parse_date(f as i64),
                _ => defaulted(&n.to_string()),
            },
        },
        other => defaulted(&format!("{:?}", other)),
    }
}

/// Encode a date as its local calendar day, `YYYY-MM-DD`.
pub fn format_date(date: &DateTime<Local>) -> String {
    date.date_naive().format("%Y-%m-%d").to_string()
}
