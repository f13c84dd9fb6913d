//! # Calendar Arithmetic
//!
//! All dates in Trendline are plain ISO `YYYY-MM-DD` calendar dates,
//! interpreted as UTC midnight. Day counts are the ceiling of the elapsed
//! time divided by 24 hours; for midnight-aligned dates that is exactly the
//! number of calendar days between them, which is what [`days_between`]
//! computes.
//!
//! "Today" is the current UTC calendar date, matching how progress dates are
//! keyed in stored records.

use chrono::{Duration, NaiveDate, Utc};

use crate::error::ValidationError;

/// Serialized date format for every date in a project record.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    // chrono accepts unpadded fields ("2024-1-5"); stored keys must be canonical.
    if trimmed.len() != 10 {
        return Err(ValidationError::InvalidDate {
            value: value.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Whole calendar days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Every calendar date from `start` to `end`, both inclusive.
///
/// Empty when `end` precedes `start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let len = days_between(start, end) + 1;
    (0..len.max(0)).map(move |offset| start + Duration::days(offset))
}

/// The current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
