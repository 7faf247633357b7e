//! Timestamp parsing and normalization
//!
//! The service sends ISO-8601 timestamps in whatever offset it feels like:
//! `Z`, a fixed offset, or a naive local-looking string, with up to seven
//! fractional digits. Everything exposed to library consumers is normalized
//! to one canonical form: UTC, seconds precision, `Z` suffix.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::errors::{CityPermitError, Result};

/// Parse an API timestamp, preserving its original offset
///
/// Naive timestamps are interpreted as UTC.
///
/// # Errors
///
/// Returns `Parse` (labelled with `field`) when the value is not an ISO-8601
/// timestamp.
pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| CityPermitError::Parse(format!("invalid timestamp for {field}: {value:?}")))
}

/// Format a UTC timestamp in the canonical form `YYYY-MM-DDTHH:MM:SSZ`
///
/// Sub-second precision is dropped.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Normalize an API timestamp string to the canonical UTC form
///
/// # Examples
///
/// ```
/// use citypermit_domain::utils::time::normalize_timestamp;
///
/// let canonical = normalize_timestamp("2025-12-23T02:47:00+02:00", "example").unwrap();
/// assert_eq!(canonical, "2025-12-23T00:47:00Z");
/// ```
///
/// # Errors
///
/// Returns `Parse` when the value is not an ISO-8601 timestamp.
pub fn normalize_timestamp(value: &str, field: &str) -> Result<String> {
    let parsed = parse_timestamp(value, field)?;
    Ok(format_timestamp(&parsed.with_timezone(&Utc)))
}
