//! # Burndown Engine
//!
//! Pure computation of burndown statistics, chart series, and status from a
//! [`Project`] and a reference date. No I/O and no hidden state: the same
//! `(project, today)` always yields the same [`BurndownReport`].
//!
//! ## Day Counting
//!
//! `total_days` and `days_passed` are ceiling day counts from the start date
//! (see [`crate::calendar`]). `days_passed` is deliberately not clamped: it is
//! negative before the start date and exceeds `total_days` after the end.
//!
//! ## Status Band
//!
//! Status compares completed work against the linear expectation with a ±5%
//! tolerance band. At or above 95% of expected is on track; strictly above
//! 105% is ahead.
//!
//! ## Arithmetic
//!
//! Daily counts are arbitrary `i64` values. Totals, remaining work, and the
//! running sum of the actual curve saturate at the `i64` bounds rather than
//! overflow.
//!
//! ## Preconditions
//!
//! The expected-progress ratio divides by `total_days` and the ideal line
//! divides by `days − 1`. Both are zero for a single-day range, so any
//! project whose end date is not strictly after its start date yields
//! [`BurndownError::InvalidRange`] instead of a report. A timeline longer
//! than [`MAX_RANGE_DAYS`] (reachable through a metadata patch) yields
//! [`BurndownError::RangeTooLong`] before any chart point is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{date_range, days_between};
use crate::error::BurndownError;
use crate::project::{Project, MAX_RANGE_DAYS};

/// Lower edge of the on-track band, as a fraction of expected progress.
pub const ON_TRACK_LOWER: f64 = 0.95;

/// Upper edge of the on-track band. Progress strictly above this is ahead.
pub const ON_TRACK_UPPER: f64 = 1.05;

/// Burndown status relative to the ideal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BurndownStatus {
    /// More than 105% of expected progress.
    Ahead,
    /// Between 95% and 105% of expected progress, inclusive.
    OnTrack,
    /// Below 95% of expected progress.
    Behind,
}

impl BurndownStatus {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ahead => "Ahead",
            Self::OnTrack => "On Track",
            Self::Behind => "Behind",
        }
    }
}

impl std::fmt::Display for BurndownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One calendar day on the burndown chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChartPoint {
    /// Calendar day.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    /// Remaining tasks on the ideal straight line.
    pub ideal: f64,
    /// Remaining tasks actually reported. `None` for dates after "today".
    pub actual: Option<i64>,
}

/// A single recorded day, for the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistoryEntry {
    /// Day the work was done.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    /// Tasks completed that day.
    pub tasks_completed: i64,
    /// "1 task" or "N tasks".
    pub label: String,
}

/// Everything the presentation layer needs to draw a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BurndownReport {
    /// Total scope of work.
    pub total_tasks: i64,
    /// Sum of all recorded daily progress.
    pub total_completed: i64,
    /// `total_tasks − total_completed`; negative when over-reported.
    pub remaining: i64,
    /// Days from start to end.
    pub total_days: i64,
    /// Days from start to "today"; unclamped.
    pub days_passed: i64,
    /// Tasks the ideal line expects done by "today".
    pub expected_progress: f64,
    /// Classification of actual against expected progress.
    pub status: BurndownStatus,
    /// One point per day from start to end inclusive.
    pub chart: Vec<ChartPoint>,
    /// Recorded days, most recent first.
    pub history: Vec<HistoryEntry>,
}

/// Compute the full burndown report for `project` as of `today`.
pub fn compute(project: &Project, today: NaiveDate) -> Result<BurndownReport, BurndownError> {
    let total_days = days_between(project.start_date, project.end_date);
    if total_days <= 0 {
        return Err(BurndownError::InvalidRange {
            start: project.start_date,
            end: project.end_date,
        });
    }
    if total_days > MAX_RANGE_DAYS {
        return Err(BurndownError::RangeTooLong {
            start: project.start_date,
            end: project.end_date,
            max_days: MAX_RANGE_DAYS,
        });
    }

    let total_completed = project.total_completed();
    let days_passed = days_between(project.start_date, today);
    let expected_progress = expected_progress(project.total_tasks, days_passed, total_days);
    let status = classify(total_completed as f64, expected_progress);

    let dates: Vec<NaiveDate> = date_range(project.start_date, project.end_date).collect();
    let ideal =
        ideal_curve(project.total_tasks, dates.len()).ok_or(BurndownError::InvalidRange {
            start: project.start_date,
            end: project.end_date,
        })?;
    let actual = actual_curve(project, &dates, today);
    let chart = dates
        .into_iter()
        .zip(ideal)
        .zip(actual)
        .map(|((date, ideal), actual)| ChartPoint {
            date,
            ideal,
            actual,
        })
        .collect();

    Ok(BurndownReport {
        total_tasks: project.total_tasks,
        total_completed,
        remaining: project.total_tasks.saturating_sub(total_completed),
        total_days,
        days_passed,
        expected_progress,
        status,
        chart,
        history: progress_history(project),
    })
}

/// Linear expectation: `total_tasks × days_passed / total_days`.
///
/// The caller guarantees `total_days != 0`.
fn expected_progress(total_tasks: i64, days_passed: i64, total_days: i64) -> f64 {
    (total_tasks as f64 * days_passed as f64) / total_days as f64
}

/// Classify completed work against the expected amount.
pub fn classify(actual: f64, expected: f64) -> BurndownStatus {
    if actual >= expected * ON_TRACK_LOWER {
        if actual > expected * ON_TRACK_UPPER {
            BurndownStatus::Ahead
        } else {
            BurndownStatus::OnTrack
        }
    } else {
        BurndownStatus::Behind
    }
}

/// Straight line from `total_tasks` on day 0 down to 0 on the last of
/// `day_count` days. `None` when fewer than two days are given.
pub fn ideal_curve(total_tasks: i64, day_count: usize) -> Option<Vec<f64>> {
    if day_count < 2 {
        return None;
    }
    let total = total_tasks as f64;
    let step = total / (day_count - 1) as f64;
    Some((0..day_count).map(|i| total - step * i as f64).collect())
}

/// Remaining tasks per date, walking `dates` in order with a running sum of
/// recorded progress. Dates after `today` are not plotted.
///
/// Progress recorded on dates outside `dates` never enters the running sum.
pub fn actual_curve(project: &Project, dates: &[NaiveDate], today: NaiveDate) -> Vec<Option<i64>> {
    let mut cumulative = 0i64;
    dates
        .iter()
        .map(|date| {
            let tasks = project.daily_progress.get(date).copied().unwrap_or(0);
            cumulative = cumulative.saturating_add(tasks);
            if *date > today {
                None
            } else {
                Some(project.total_tasks.saturating_sub(cumulative))
            }
        })
        .collect()
}

/// Recorded days ordered most recent first.
pub fn progress_history(project: &Project) -> Vec<HistoryEntry> {
    project
        .daily_progress
        .iter()
        .rev()
        .map(|(date, &tasks)| HistoryEntry {
            date: *date,
            tasks_completed: tasks,
            label: task_label(tasks),
        })
        .collect()
}

/// "1 task" for exactly one, "N tasks" otherwise.
pub fn task_label(tasks: i64) -> String {
    if tasks == 1 {
        "1 task".to_string()
    } else {
        format!("{tasks} tasks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use crate::project::ProjectId;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn demo() -> Project {
        Project::new(
            ProjectId::new("demo").unwrap(),
            10,
            date("2024-01-01"),
            date("2024-01-11"),
        )
        .unwrap()
    }

    #[test]
    fn demo_scenario_is_ahead() {
        let mut p = demo();
        p.record_progress(date("2024-01-01"), 2);
        p.record_progress(date("2024-01-02"), 3);

        let report = compute(&p, date("2024-01-02")).unwrap();
        assert_eq!(report.total_completed, 5);
        assert_eq!(report.remaining, 5);
        assert_eq!(report.days_passed, 1);
        assert_eq!(report.total_days, 10);
        assert_eq!(report.expected_progress, 1.0);
        assert_eq!(report.status, BurndownStatus::Ahead);
        assert_eq!(report.chart.len(), 11);
    }

    #[test]
    fn status_band_boundaries() {
        assert_eq!(classify(95.0, 100.0), BurndownStatus::OnTrack);
        assert_eq!(classify(94.0, 100.0), BurndownStatus::Behind);
        assert_eq!(classify(106.0, 100.0), BurndownStatus::Ahead);
        assert_eq!(classify(105.0, 100.0), BurndownStatus::OnTrack);
        assert_eq!(classify(100.0, 100.0), BurndownStatus::OnTrack);
    }

    #[test]
    fn status_before_start_with_no_progress() {
        // Negative expectation: zero work is above 95% of it, and above 105%.
        let p = demo();
        let report = compute(&p, date("2023-12-30")).unwrap();
        assert_eq!(report.days_passed, -2);
        assert_eq!(report.expected_progress, -2.0);
        assert_eq!(report.status, BurndownStatus::Ahead);
    }

    #[test]
    fn status_on_start_day_with_no_progress_is_on_track() {
        let report = compute(&demo(), date("2024-01-01")).unwrap();
        assert_eq!(report.expected_progress, 0.0);
        assert_eq!(report.status, BurndownStatus::OnTrack);
    }

    #[test]
    fn days_passed_is_not_clamped_after_end() {
        let report = compute(&demo(), date("2024-01-21")).unwrap();
        assert_eq!(report.days_passed, 20);
        assert_eq!(report.expected_progress, 20.0);
        assert_eq!(report.status, BurndownStatus::Behind);
    }

    #[test]
    fn remaining_goes_negative_when_over_reported() {
        let mut p = demo();
        p.record_progress(date("2024-01-01"), 12);
        let report = compute(&p, date("2024-01-03")).unwrap();
        assert_eq!(report.remaining, -2);
    }

    #[test]
    fn extreme_counts_saturate_instead_of_overflowing() {
        let mut p = demo();
        p.record_progress(date("2024-01-01"), i64::MAX);
        p.record_progress(date("2024-01-02"), 1);

        let report = compute(&p, date("2024-01-02")).unwrap();
        assert_eq!(report.total_completed, i64::MAX);
        assert_eq!(report.remaining, 10 - i64::MAX);
        assert_eq!(report.status, BurndownStatus::Ahead);
        assert_eq!(report.chart[0].actual, Some(10 - i64::MAX));
        assert_eq!(report.chart[1].actual, Some(10 - i64::MAX));
    }

    #[test]
    fn extreme_negative_counts_saturate() {
        let mut p = demo();
        p.record_progress(date("2024-01-01"), i64::MIN);
        p.record_progress(date("2024-01-02"), -1);

        let report = compute(&p, date("2024-01-02")).unwrap();
        assert_eq!(report.total_completed, i64::MIN);
        assert_eq!(report.remaining, i64::MAX);
        assert_eq!(report.status, BurndownStatus::Behind);
        assert_eq!(report.chart[1].actual, Some(i64::MAX));
    }

    #[test]
    fn ideal_curve_endpoints_and_spacing() {
        let curve = ideal_curve(10, 11).unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0], 10.0);
        assert_eq!(curve[10], 0.0);
        for pair in curve.windows(2) {
            assert!((pair[0] - pair[1] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ideal_curve_needs_two_days() {
        assert!(ideal_curve(10, 1).is_none());
        assert!(ideal_curve(10, 0).is_none());
    }

    #[test]
    fn single_day_range_is_invalid() {
        let mut p = demo();
        p.end_date = p.start_date;
        assert_eq!(
            compute(&p, date("2024-01-01")),
            Err(BurndownError::InvalidRange {
                start: date("2024-01-01"),
                end: date("2024-01-01"),
            })
        );
    }

    #[test]
    fn oversized_range_after_patch_is_refused() {
        let mut p = demo();
        p.start_date = date("0001-01-01");
        p.end_date = date("9999-12-31");
        assert!(matches!(
            compute(&p, date("2024-01-01")),
            Err(BurndownError::RangeTooLong { max_days: MAX_RANGE_DAYS, .. })
        ));
    }

    #[test]
    fn inverted_range_after_patch_is_invalid() {
        let mut p = demo();
        p.end_date = date("2023-12-25");
        assert!(matches!(
            compute(&p, date("2024-01-01")),
            Err(BurndownError::InvalidRange { .. })
        ));
    }

    #[test]
    fn actual_curve_stops_after_today() {
        let mut p = demo();
        p.record_progress(date("2024-01-01"), 2);
        p.record_progress(date("2024-01-03"), 1);
        // Recorded future value still must not be plotted.
        p.record_progress(date("2024-01-06"), 4);

        let report = compute(&p, date("2024-01-04")).unwrap();
        let actual: Vec<Option<i64>> = report.chart.iter().map(|pt| pt.actual).collect();
        assert_eq!(&actual[..4], &[Some(8), Some(8), Some(7), Some(7)]);
        assert!(actual[4..].iter().all(Option::is_none));
    }

    #[test]
    fn actual_curve_ignores_progress_outside_range() {
        let mut p = demo();
        p.record_progress(date("2023-12-31"), 3);
        p.record_progress(date("2024-01-02"), 1);
        let report = compute(&p, date("2024-01-02")).unwrap();
        assert_eq!(report.total_completed, 4);
        assert_eq!(report.chart[1].actual, Some(9));
    }

    #[test]
    fn history_is_date_descending_with_labels() {
        let mut p = demo();
        p.record_progress(date("2024-01-03"), 1);
        p.record_progress(date("2024-01-01"), 0);
        p.record_progress(date("2024-01-02"), 4);

        let history = progress_history(&p);
        let dates: Vec<String> = history.iter().map(|h| h.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
        assert_eq!(history[0].label, "1 task");
        assert_eq!(history[1].label, "4 tasks");
        assert_eq!(history[2].label, "0 tasks");
    }

    #[test]
    fn status_labels() {
        assert_eq!(BurndownStatus::OnTrack.to_string(), "On Track");
        assert_eq!(
            serde_json::to_value(BurndownStatus::OnTrack).unwrap(),
            "on_track"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::project::ProjectId;
    use proptest::prelude::*;

    fn base() -> Project {
        Project::new(
            ProjectId::new("prop").unwrap(),
            40,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap()
    }

    proptest! {
        /// Total completed is the plain sum, whatever order entries arrive in.
        #[test]
        fn total_completed_ignores_insertion_order(
            entries in prop::collection::btree_map(0i64..60, -5i64..20, 0..40)
        ) {
            let start = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
            let mut forward = base();
            let mut reverse = base();
            for (offset, tasks) in &entries {
                forward.record_progress(start + chrono::Duration::days(*offset), *tasks);
            }
            for (offset, tasks) in entries.iter().rev() {
                reverse.record_progress(start + chrono::Duration::days(*offset), *tasks);
            }
            let sum: i64 = entries.values().sum();
            prop_assert_eq!(forward.total_completed(), sum);
            prop_assert_eq!(reverse.total_completed(), sum);
            prop_assert_eq!(&forward, &reverse);
        }

        /// The ideal line starts at the total, ends at zero, never increases.
        #[test]
        fn ideal_curve_shape(total in 1i64..10_000, days in 2usize..400) {
            let curve = ideal_curve(total, days).unwrap();
            prop_assert_eq!(curve.len(), days);
            prop_assert_eq!(curve[0], total as f64);
            prop_assert!(curve[days - 1].abs() < 1e-6);
            for pair in curve.windows(2) {
                prop_assert!(pair[1] <= pair[0]);
            }
        }

        /// Consecutive ideal points are evenly spaced by `total / (days - 1)`.
        #[test]
        fn ideal_curve_is_a_straight_line(total in 1i64..1_000_000, days in 2usize..800) {
            let curve = ideal_curve(total, days).unwrap();
            let step = total as f64 / (days - 1) as f64;
            let tolerance = 1e-9 * total as f64;
            for (i, pair) in curve.windows(2).enumerate() {
                let gap = pair[0] - pair[1];
                prop_assert!(
                    (gap - step).abs() <= tolerance,
                    "gap {} at {} differs from step {}", gap, i, step
                );
            }
        }

        /// Any recorded counts, however large, produce a report.
        #[test]
        fn extreme_counts_never_panic(
            counts in prop::collection::vec(any::<i64>(), 0..31),
            today_offset in -5i64..40,
        ) {
            let mut p = base();
            let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            for (offset, tasks) in counts.iter().enumerate() {
                p.record_progress(start + chrono::Duration::days(offset as i64), *tasks);
            }
            let report = compute(&p, start + chrono::Duration::days(today_offset)).unwrap();
            prop_assert_eq!(report.total_completed, p.total_completed());
            prop_assert_eq!(
                report.remaining,
                p.total_tasks.saturating_sub(report.total_completed)
            );
            prop_assert_eq!(report.chart.len(), 31);
        }

        /// No actual point is ever plotted after "today".
        #[test]
        fn actual_never_after_today(today_offset in -10i64..45) {
            let mut p = base();
            p.record_progress(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 3);
            let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
                + chrono::Duration::days(today_offset);
            let report = compute(&p, today).unwrap();
            for point in &report.chart {
                if point.date > today {
                    prop_assert!(point.actual.is_none());
                } else {
                    prop_assert!(point.actual.is_some());
                }
            }
        }
    }
}
