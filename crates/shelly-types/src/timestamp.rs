//! Fixed-width timestamp format for stored readings.
//!
//! Records are stamped with local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
//! The format is fixed-width with fields in big-endian order, so comparing
//! two timestamps as strings gives the same answer as comparing them as
//! times. Range queries rely on this, which is why every helper here rejects
//! anything that is not exactly canonical.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::{ParseError, ParseResult};

/// `strftime` pattern for stored timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_LEN: usize = 19;
const DATE_LEN: usize = 10;

/// Current local wall-clock time in the stored format.
#[must_use]
pub fn now_local() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Format a naive date-time in the stored format.
#[must_use]
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp in the exact stored format.
///
/// Non-padded fields such as `2024-1-1 0:0:0` are rejected even though
/// chrono would accept them, since they break lexicographic ordering.
///
/// # Examples
///
/// ```
/// use shelly_types::timestamp::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-01 00:05:00").is_ok());
/// assert!(parse_timestamp("2024-1-1 0:5:0").is_err());
/// assert!(parse_timestamp("2024-01-01T00:05:00").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> ParseResult<NaiveDateTime> {
    if s.len() != TIMESTAMP_LEN {
        return Err(ParseError::InvalidTimestamp(s.to_string()));
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .filter(|dt| format_timestamp(*dt) == s)
        .ok_or_else(|| ParseError::InvalidTimestamp(s.to_string()))
}

/// Check that a string is a canonical stored timestamp.
pub fn validate_timestamp(s: &str) -> ParseResult<()> {
    parse_timestamp(s).map(|_| ())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != DATE_LEN {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == s)
}

/// Normalize the lower bound of a range.
///
/// Accepts a full timestamp or a bare `YYYY-MM-DD`, which expands to the
/// start of that day.
///
/// ```
/// use shelly_types::timestamp::range_start;
///
/// assert_eq!(range_start("2024-01-01").unwrap(), "2024-01-01 00:00:00");
/// assert_eq!(range_start("2024-01-01 12:30:00").unwrap(), "2024-01-01 12:30:00");
/// ```
pub fn range_start(s: &str) -> ParseResult<String> {
    let s = s.trim();
    if let Some(date) = parse_date(s) {
        return Ok(format!("{} 00:00:00", date.format(DATE_FORMAT)));
    }
    parse_timestamp(s).map(format_timestamp)
}

/// Normalize the upper bound of a range.
///
/// A bare `YYYY-MM-DD` expands to the last second of that day, so the range
/// stays inclusive of the whole day.
///
/// ```
/// use shelly_types::timestamp::range_end;
///
/// assert_eq!(range_end("2024-01-01").unwrap(), "2024-01-01 23:59:59");
/// ```
pub fn range_end(s: &str) -> ParseResult<String> {
    let s = s.trim();
    if let Some(date) = parse_date(s) {
        return Ok(format!("{} 23:59:59", date.format(DATE_FORMAT)));
    }
    parse_timestamp(s).map(format_timestamp)
}
