//! # Terminal Rendering
//!
//! Pure text formatting of a [`BurndownReport`]: the stats block, the
//! day-by-day chart table, and the progress history. Nothing here does
//! I/O, so every function is tested on its string output.

use std::fmt::Write;

use chrono::NaiveDate;
use trendline_core::{BurndownReport, HistoryEntry, Project};

/// Shown in place of the history list when no day has been recorded.
pub const EMPTY_HISTORY: &str = "No progress recorded yet";

/// `Jan 2, 2024`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Headline numbers and status.
pub fn render_stats(report: &BurndownReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total tasks:  {}", report.total_tasks);
    let _ = writeln!(out, "Completed:    {}", report.total_completed);
    let _ = writeln!(out, "Remaining:    {}", report.remaining);
    let _ = writeln!(
        out,
        "Day:          {} of {}",
        report.days_passed, report.total_days
    );
    let _ = writeln!(out, "Expected:     {:.1}", report.expected_progress);
    let _ = writeln!(out, "Status:       {}", report.status);
    out
}

/// One row per day with ideal and actual remaining tasks. Actual is blank
/// for days after the reference date.
pub fn render_chart(report: &BurndownReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>7} {:>7}", "Date", "Ideal", "Actual");
    for point in &report.chart {
        let actual = point
            .actual
            .map(|a| a.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<12} {:>7} {:>7}",
            point.date.to_string(),
            point.ideal.round() as i64,
            actual
        );
    }
    out
}

/// Recorded days, newest first, or [`EMPTY_HISTORY`].
pub fn render_history(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return format!("{EMPTY_HISTORY}\n");
    }
    let mut out = String::new();
    for entry in history {
        let _ = writeln!(out, "{:<14} {}", display_date(entry.date), entry.label);
    }
    out
}

/// The full project view: title, stats, chart, and history.
pub fn render_report(project: &Project, report: &BurndownReport) -> String {
    let title = project
        .project_name
        .clone()
        .unwrap_or_else(|| project.project_id.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "{} – {}",
        display_date(project.start_date),
        display_date(project.end_date)
    );
    out.push('\n');
    out.push_str(&render_stats(report));
    out.push('\n');
    out.push_str(&render_chart(report));
    out.push('\n');
    out.push_str("History\n");
    out.push_str(&render_history(&report.history));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendline_core::{burndown, ProjectId};

    fn date(s: &str) -> NaiveDate {
        trendline_core::parse_date(s).unwrap()
    }

    fn demo() -> Project {
        let mut p = Project::new(
            ProjectId::new("demo").unwrap(),
            10,
            date("2024-01-01"),
            date("2024-01-11"),
        )
        .unwrap();
        p.record_progress(date("2024-01-01"), 2);
        p.record_progress(date("2024-01-02"), 3);
        p
    }

    #[test]
    fn display_date_has_no_zero_padding() {
        assert_eq!(display_date(date("2024-01-02")), "Jan 2, 2024");
        assert_eq!(display_date(date("2023-12-25")), "Dec 25, 2023");
    }

    #[test]
    fn stats_show_status_label() {
        let report = burndown::compute(&demo(), date("2024-01-02")).unwrap();
        let stats = render_stats(&report);
        assert!(stats.contains("Completed:    5"));
        assert!(stats.contains("Remaining:    5"));
        assert!(stats.contains("Day:          1 of 10"));
        assert!(stats.contains("Status:       Ahead"));
    }

    #[test]
    fn chart_leaves_future_actual_blank() {
        let report = burndown::compute(&demo(), date("2024-01-02")).unwrap();
        let chart = render_chart(&report);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["2024-01-01", "10", "8"]);
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["2024-01-02", "9", "5"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), ["2024-01-03", "8"]);
    }

    #[test]
    fn chart_rounds_fractional_ideal() {
        let p = Project::new(
            ProjectId::new("thirds").unwrap(),
            10,
            date("2024-01-01"),
            date("2024-01-04"),
        )
        .unwrap();
        let report = burndown::compute(&p, date("2024-01-01")).unwrap();
        let chart = render_chart(&report);
        // 10, 6.67, 3.33, 0
        let ideals: Vec<&str> = chart
            .lines()
            .skip(1)
            .map(|l| l.split_whitespace().nth(1).unwrap())
            .collect();
        assert_eq!(ideals, ["10", "7", "3", "0"]);
    }

    #[test]
    fn history_lists_newest_first_with_display_dates() {
        let report = burndown::compute(&demo(), date("2024-01-02")).unwrap();
        let history = render_history(&report.history);
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Jan 2, 2024"));
        assert!(lines[0].ends_with("3 tasks"));
        assert!(lines[1].starts_with("Jan 1, 2024"));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(render_history(&[]), "No progress recorded yet\n");
    }

    #[test]
    fn report_uses_name_when_present() {
        let mut p = demo();
        p.project_name = Some("Sprint 7".into());
        let report = burndown::compute(&p, date("2024-01-02")).unwrap();
        let text = render_report(&p, &report);
        assert!(text.starts_with("Sprint 7\nJan 1, 2024 – Jan 11, 2024\n"));
        assert!(text.contains("History\n"));
    }
}
