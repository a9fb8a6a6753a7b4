use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ReportError, Result};

/// Layout of the `timestamp` column in access logs, e.g. `2013-09-01 09:00:00UTC`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SUTC";

/// Layout accepted for `--from` / `--to`, e.g. `2013-09-01 09:30:00`.
pub const CLI_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// chrono accepts single-digit fields, so the exact shape is checked first.
static LOG_TIMESTAMP_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}UTC$")
        .expect("timestamp pattern is valid")
});

static CLI_DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$")
        .expect("date pattern is valid")
});

/// Parses a log timestamp such as `2013-09-01 09:00:00UTC`.
///
/// The text must match the layout exactly: no surrounding whitespace, no
/// space before `UTC`, two-digit fields. Out-of-range values (month 13,
/// hour 25) are rejected as well.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    parse_with(text, &LOG_TIMESTAMP_SHAPE, LOG_TIMESTAMP_FORMAT)
}

/// Parses a range bound given on the command line, interpreted as UTC.
pub fn parse_cli_date(text: &str) -> Result<DateTime<Utc>> {
    parse_with(text, &CLI_DATE_SHAPE, CLI_DATE_FORMAT)
}

fn parse_with(text: &str, shape: &Regex, format: &str) -> Result<DateTime<Utc>> {
    if !shape.is_match(text) {
        return Err(ReportError::Format {
            value: text.to_string(),
        });
    }

    NaiveDateTime::parse_from_str(text, format)
        .map(|naive| naive.and_utc())
        .map_err(|_| ReportError::Format {
            value: text.to_string(),
        })
}
