//! Timestamp normalization for device readings.
//!
//! Readings arrive with two kinds of timestamp: ISO-8601 style strings and
//! the compact fixed-width backend encoding (`20250822T040135293` or
//! `20250822040135293`). Both normalize to a [`CanonicalInstant`] in UTC with
//! millisecond precision. Anything else is rejected with a [`TimestampError`];
//! parsing never panics.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::zone::ReferenceZone;

/// Length of the all-digit compact form `YYYYMMDDHHMMSSfff`.
const COMPACT_LEN: usize = 17;

/// Length of the separated compact form `YYYYMMDDTHHMMSSfff`.
const COMPACT_SEPARATED_LEN: usize = 18;

/// Byte offset of the literal separator in the separated compact form.
const COMPACT_SEPARATOR_AT: usize = 8;

const COMPACT_SEPARATOR: u8 = b'T';

/// Zone-less layouts, read as UTC wall clock.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying an explicit offset that RFC 3339 does not cover.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Why a raw timestamp could not be normalized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("timestamp is not a string")]
    NotAString,

    #[error("malformed timestamp: {0}")]
    Malformed(String),

    #[error("timestamp out of range: {0}")]
    OutOfRange(String),
}

/// A normalized, totally ordered point in time (UTC, millisecond precision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalInstant(DateTime<Utc>);

impl CanonicalInstant {
    /// Wrap a UTC datetime, truncating anything below a millisecond.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let millis_only = (dt.nanosecond() / 1_000_000) * 1_000_000;
        Self(dt.with_nanosecond(millis_only).unwrap_or(dt))
    }

    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// This instant on the wall clock of a reference zone.
    pub fn in_zone(&self, zone: &ReferenceZone) -> DateTime<FixedOffset> {
        zone.localize(self.0)
    }

    /// Calendar date of this instant in a reference zone.
    pub fn date_in(&self, zone: &ReferenceZone) -> NaiveDate {
        self.in_zone(zone).date_naive()
    }

    /// Render in the compact backend encoding `YYYYMMDDTHHMMSSfff`.
    pub fn to_compact(&self) -> String {
        self.0.format("%Y%m%dT%H%M%S%3f").to_string()
    }
}

impl fmt::Display for CanonicalInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

impl From<DateTime<Utc>> for CanonicalInstant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

/// Normalize a raw timestamp.
///
/// Strings containing `-` or `:` are parsed as calendar date/times. Otherwise
/// a compact-length string is decoded field by field as UTC, and must be all
/// digits where digits are expected. Everything else gets one last attempt as
/// a calendar date/time.
pub fn parse(raw: &str) -> Result<CanonicalInstant, TimestampError> {
    if raw.is_empty() {
        return Err(TimestampError::Empty);
    }

    if raw.contains('-') || raw.contains(':') {
        return parse_standard(raw);
    }

    if let Some((date, time)) = split_compact(raw) {
        return decode_compact(date, time);
    }

    parse_standard(raw)
}

/// Normalize an optional raw timestamp; `None` is treated as invalid input.
pub fn parse_opt(raw: Option<&str>) -> Result<CanonicalInstant, TimestampError> {
    match raw {
        Some(raw) => parse(raw),
        None => Err(TimestampError::Empty),
    }
}

/// Normalize a loosely typed JSON value. Only non-empty strings can succeed.
pub fn parse_value(raw: &serde_json::Value) -> Result<CanonicalInstant, TimestampError> {
    match raw {
        serde_json::Value::String(s) => parse(s),
        serde_json::Value::Null => Err(TimestampError::Empty),
        _ => Err(TimestampError::NotAString),
    }
}

fn split_compact(raw: &str) -> Option<(&str, &str)> {
    let bytes = raw.as_bytes();
    match bytes.len() {
        COMPACT_LEN => Some((raw.get(..8)?, raw.get(8..)?)),
        COMPACT_SEPARATED_LEN if bytes[COMPACT_SEPARATOR_AT] == COMPACT_SEPARATOR => {
            Some((raw.get(..8)?, raw.get(9..)?))
        }
        _ => None,
    }
}

fn decode_compact(date: &str, time: &str) -> Result<CanonicalInstant, TimestampError> {
    let year = digits(date, 0, 4)?;
    let month = digits(date, 4, 2)?;
    let day = digits(date, 6, 2)?;
    let hour = digits(time, 0, 2)?;
    let minute = digits(time, 2, 2)?;
    let second = digits(time, 4, 2)?;
    let millisecond = digits(time, 6, 3)?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
        TimestampError::OutOfRange(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
    })?;
    let naive = date
        .and_hms_milli_opt(hour, minute, second, millisecond)
        .ok_or_else(|| {
            TimestampError::OutOfRange(format!(
                "{hour:02}:{minute:02}:{second:02}.{millisecond:03} is not a time of day"
            ))
        })?;

    Ok(CanonicalInstant::from_utc(Utc.from_utc_datetime(&naive)))
}

/// Decode a fixed-width unsigned decimal field.
fn digits(field: &str, start: usize, len: usize) -> Result<u32, TimestampError> {
    let slice = field
        .get(start..start + len)
        .ok_or_else(|| TimestampError::Malformed(format!("field too short: {field:?}")))?;

    if !slice.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::Malformed(format!(
            "expected digits, found {slice:?}"
        )));
    }

    Ok(slice
        .bytes()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')))
}

fn parse_standard(raw: &str) -> Result<CanonicalInstant, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(CanonicalInstant::from_utc(dt.with_timezone(&Utc)));
    }

    for layout in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, layout) {
            return Ok(CanonicalInstant::from_utc(dt.with_timezone(&Utc)));
        }
    }

    for layout in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(CanonicalInstant::from_utc(Utc.from_utc_datetime(&naive)));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(CanonicalInstant::from_utc(Utc.from_utc_datetime(&midnight)));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(CanonicalInstant::from_utc(dt.with_timezone(&Utc)));
    }

    Err(TimestampError::Malformed(raw.to_string()))
}
