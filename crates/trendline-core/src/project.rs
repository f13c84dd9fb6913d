//! # Project Record
//!
//! The single persistent entity. A project is stored and fetched as a whole
//! value; every mutation is a read-modify-write of the full record.
//!
//! Serialized field names are camelCase (`projectId`, `totalTasks`,
//! `startDate`, `endDate`, `dailyProgress`) to match the HTTP contract.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::days_between;
use crate::error::ValidationError;

/// User-chosen project identifier.
///
/// Used verbatim as the storage key suffix and as a URL path segment in
/// share links. The only enforced constraint is non-emptiness; callers
/// percent-encode it where it is embedded in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = String))]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a project ID, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyProjectId);
        }
        Ok(Self(id))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A burndown project.
///
/// `daily_progress` maps a calendar date to the number of tasks completed on
/// that specific day (not a running total). Dates without an entry count as
/// zero. Values are not required to be non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Project {
    /// Unique key; immutable after creation.
    pub project_id: ProjectId,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Total scope of work.
    pub total_tasks: i64,
    /// First day of the burndown.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub start_date: NaiveDate,
    /// Last day of the burndown, inclusive.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub end_date: NaiveDate,
    /// Tasks completed per calendar day.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub daily_progress: BTreeMap<NaiveDate, i64>,
}

impl Project {
    /// Create a project with no recorded progress.
    ///
    /// Enforces the creation invariants: `total_tasks > 0` and
    /// `start_date < end_date`. These are not re-checked after metadata
    /// patches.
    pub fn new(
        project_id: ProjectId,
        total_tasks: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if total_tasks <= 0 {
            return Err(ValidationError::NonPositiveTotalTasks(total_tasks));
        }
        ensure_valid_range(start_date, end_date)?;
        Ok(Self {
            project_id,
            project_name: None,
            total_tasks,
            start_date,
            end_date,
            daily_progress: BTreeMap::new(),
        })
    }

    /// Replace the recorded progress map.
    pub fn with_progress(mut self, daily_progress: BTreeMap<NaiveDate, i64>) -> Self {
        self.daily_progress = daily_progress;
        self
    }

    /// Record the tasks completed on `date`, overwriting any earlier value
    /// for that exact date. Returns the previous value, if any.
    pub fn record_progress(&mut self, date: NaiveDate, tasks_completed: i64) -> Option<i64> {
        self.daily_progress.insert(date, tasks_completed)
    }

    /// Apply a partial metadata update. Only fields present in the patch
    /// change; the ID, task total, and progress are never touched.
    pub fn apply_patch(&mut self, patch: &MetadataPatch) {
        if let Some(name) = &patch.project_name {
            self.project_name = Some(name.clone());
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
    }

    /// Sum of all recorded daily values, saturating at the `i64` bounds.
    pub fn total_completed(&self) -> i64 {
        self.daily_progress
            .values()
            .fold(0i64, |acc, &tasks| acc.saturating_add(tasks))
    }

    /// Check a progress date before submitting it: it must fall inside
    /// `[start_date, end_date]` and must not be after `today`.
    ///
    /// The progress API itself accepts any date; this is the guard the
    /// presentation layer applies first.
    pub fn check_progress_date(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if date < self.start_date || date > self.end_date {
            return Err(ValidationError::OutsideTimeline { date });
        }
        if date > today {
            return Err(ValidationError::FutureDate { date, today });
        }
        Ok(())
    }
}

/// Longest accepted timeline, in days from start to end (about ten years).
/// The burndown chart holds one point per day of the timeline.
pub const MAX_RANGE_DAYS: i64 = 3660;

/// Require `end` to come strictly after `start`, at most
/// [`MAX_RANGE_DAYS`] later.
pub fn ensure_valid_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::EndNotAfterStart { start, end });
    }
    if days_between(start, end) > MAX_RANGE_DAYS {
        return Err(ValidationError::RangeTooLong {
            start,
            end,
            max_days: MAX_RANGE_DAYS,
        });
    }
    Ok(())
}

/// Partial update of a project's descriptive metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    /// New display name.
    pub project_name: Option<String>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New end date.
    pub end_date: Option<NaiveDate>,
}

impl MetadataPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.project_name.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}
