#![deny(missing_docs)]

//! # trendline-core: Foundational Types for Trendline
//!
//! Defines the project record every other crate exchanges, calendar-day
//! arithmetic, and the burndown engine. It performs no I/O; its only
//! external dependencies are `serde`, `thiserror`, and `chrono`
//! (plus `utoipa` behind the `openapi` feature).
//!
//! ## Design Principles
//!
//! 1. **Records are values.** A [`Project`] is fetched, modified, and stored
//!    as a whole. Nothing here holds a reference into shared state.
//!
//! 2. **Dates are calendar dates.** Every date is a [`chrono::NaiveDate`]
//!    serialized as `YYYY-MM-DD`, and day counts come from
//!    [`calendar::days_between`].
//!
//! 3. **Degenerate input is an error value.** [`burndown::compute`] returns
//!    [`BurndownError::InvalidRange`] rather than NaN or infinite output.

pub mod burndown;
pub mod calendar;
pub mod error;
pub mod project;

// Re-export primary types at crate root for ergonomic imports.
pub use burndown::{BurndownReport, BurndownStatus, ChartPoint, HistoryEntry};
pub use calendar::{parse_date, today_utc};
pub use error::{BurndownError, ValidationError};
pub use project::{ensure_valid_range, MetadataPatch, Project, ProjectId, MAX_RANGE_DAYS};
