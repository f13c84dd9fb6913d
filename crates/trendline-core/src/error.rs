//! # Error Hierarchy
//!
//! Structured error types for Trendline, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Validation errors carry the rejected input so that API callers and CLI
//! users can see exactly which value was refused.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation errors for project records and progress entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Project identifier is empty.
    #[error("project ID must be non-empty")]
    EmptyProjectId,

    /// Task total is zero or negative.
    #[error("totalTasks must be greater than zero (got {0})")]
    NonPositiveTotalTasks(i64),

    /// Date string is not an ISO `YYYY-MM-DD` calendar date.
    #[error("invalid date: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The string that failed to parse.
        value: String,
    },

    /// End date does not come strictly after the start date.
    #[error("End date must be after start date")]
    EndNotAfterStart {
        /// Proposed start date.
        start: NaiveDate,
        /// Proposed end date.
        end: NaiveDate,
    },

    /// Timeline is longer than [`crate::project::MAX_RANGE_DAYS`].
    #[error("Project timeline cannot exceed {max_days} days")]
    RangeTooLong {
        /// Proposed start date.
        start: NaiveDate,
        /// Proposed end date.
        end: NaiveDate,
        /// The enforced maximum.
        max_days: i64,
    },

    /// Progress date falls outside `[startDate, endDate]`.
    #[error("Date must be within project timeline")]
    OutsideTimeline {
        /// The rejected progress date.
        date: NaiveDate,
    },

    /// Progress date lies after the reference "today".
    #[error("Cannot add progress for future dates")]
    FutureDate {
        /// The rejected progress date.
        date: NaiveDate,
        /// The reference date it was compared against.
        today: NaiveDate,
    },
}

/// Errors from the burndown engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BurndownError {
    /// The project's date range spans fewer than two calendar days, so the
    /// expected-progress ratio and the ideal line would divide by zero.
    #[error("invalid date range {start}..{end}: the end date must come after the start date")]
    InvalidRange {
        /// Project start date.
        start: NaiveDate,
        /// Project end date.
        end: NaiveDate,
    },

    /// The project's date range is longer than the chart can hold.
    #[error("date range {start}..{end} spans more than {max_days} days")]
    RangeTooLong {
        /// Project start date.
        start: NaiveDate,
        /// Project end date.
        end: NaiveDate,
        /// The enforced maximum.
        max_days: i64,
    },
}
