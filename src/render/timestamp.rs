// src/render/timestamp.rs
//! Parameter values as timestamps.
//!
//! The animation axis is assumed to be time: every parameter value is parsed
//! and reformatted for display. A value that is not a timestamp fails the
//! task that carries it.

use crate::constants::{DISPLAY_TIMESTAMP_LAYOUT, PARAMETER_TIMESTAMP_LAYOUT};
use crate::error::AppError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses an ISO-8601-like parameter value.
///
/// Accepts RFC 3339 (`2021-01-01T00:00:00.000Z`, `2021-01-01T03:00:00+03:00`)
/// and zone-less `2021-01-01T00:00:00[.fff]`, which is read as UTC.
pub fn parse_parameter_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, PARAMETER_TIMESTAMP_LAYOUT)
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::InvalidTimestamp(value.to_string()))
}

/// Human-readable form burned into the frame, e.g. `UTC 2021-01-01 00:00`.
pub fn display_timestamp(value: &str) -> Result<String, AppError> {
    let instant = parse_parameter_timestamp(value)?;
    Ok(instant.format(DISPLAY_TIMESTAMP_LAYOUT).to_string())
}
