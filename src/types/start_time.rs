//! Start-time parsing for animation documents.
//!
//! The backend stores start times as strings in one of four encodings.
//! Parsing branches on the trailing `Z` / embedded `T`, then falls back
//! from seconds to minutes precision; the first encoding that parses
//! wins. All encodings denote UTC instants, so the same string schedules
//! the same real-world moment on every device.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Result, UnisonError};

const FMT_Z_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";
const FMT_Z_MINUTES: &str = "%Y-%m-%dT%H:%MZ";
const FMT_T_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const FMT_T_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// Format used when deriving an end time from a start time and duration.
pub(crate) const END_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an animation start time into an absolute UTC instant.
///
/// Anything outside the four accepted encodings is a hard parse failure;
/// callers surface it as a terminal error rather than guessing.
pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>> {
    let attempts: [&str; 2] = if value.ends_with('Z') {
        [FMT_Z_SECONDS, FMT_Z_MINUTES]
    } else if value.contains('T') {
        [FMT_T_SECONDS, FMT_T_MINUTES]
    } else {
        return Err(UnisonError::invalid_start_time(value));
    };

    for format in attempts {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }
    Err(UnisonError::invalid_start_time(value))
}

/// Parse a start time straight to milliseconds since the Unix epoch.
pub fn start_time_millis(value: &str) -> Result<i64> {
    parse_start_time(value).map(|instant| instant.timestamp_millis())
}
