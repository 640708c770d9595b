//! Plain-text report for stdout.
//!
//! Renders [`TableData`] as aligned columns (display-width aware) and builds
//! the summary sentences printed under the cycle-time and throughput tables.

use unicode_width::UnicodeWidthStr;

use flow_core::formatting::{format_days, format_hours};
use flow_core::models::{FlowStatistic, Granularity};
use flow_core::percentile::{percentile, percentile_threshold, FORECAST_THRESHOLD};
use flow_data::analysis::AnalysisResult;
use flow_data::analyzer::{sorted_cycle_times, BurnUpSummary};

use crate::table_view::{
    activities_table, burn_up_table, projects_table, statistics_table, timesheet_table, Align,
    TableData,
};

const COLUMN_GAP: &str = "  ";

/// Render `table` as aligned text: title, header, dashed rule, rows, totals.
pub fn render_plain(table: &TableData) -> String {
    let widths = table.column_widths();
    let mut out = String::new();

    out.push_str(&table.title);
    out.push('\n');
    push_row(&mut out, &table.headers, &widths, &table.align);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths, &table.align);

    if table.rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &table.rows {
        push_row(&mut out, row, &widths, &table.align);
    }
    if let Some(totals) = &table.totals {
        push_row(&mut out, totals, &widths, &table.align);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize], align: &[Align]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(align)
        .map(|((cell, &width), align)| pad(cell, width, *align))
        .collect();
    out.push_str(line.join(COLUMN_GAP).trim_end());
    out.push('\n');
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    match align {
        Align::Left => format!("{cell}{fill}"),
        Align::Right => format!("{fill}{cell}"),
    }
}

// ── Summary sentences ─────────────────────────────────────────────────────────

/// "85% of activities are completed within N days." or the undetermined form.
pub fn cycle_time_sentence(stats: &[FlowStatistic], granularity: Granularity) -> String {
    match percentile_threshold(stats, FORECAST_THRESHOLD) {
        Some(days) => format!("85% of {granularity} are completed within {days} days."),
        None => "Could not determine the 85% threshold for cycle times.".to_string(),
    }
}

/// "85% of days have a maximal throughput of N." or the undetermined form.
pub fn throughput_sentence(stats: &[FlowStatistic]) -> String {
    match percentile_threshold(stats, FORECAST_THRESHOLD) {
        Some(tasks) => format!("85% of days have a maximal throughput of {tasks}."),
        None => "Could not determine the 85% threshold for throughput.".to_string(),
    }
}

/// `["Cycle Time: N days", "Throughput: N tasks"]` for a non-empty burn-up.
pub fn burn_up_summary_lines(summary: &BurnUpSummary) -> [String; 2] {
    [
        format!("Cycle Time: {} days", summary.days),
        format!("Throughput: {} tasks", summary.throughput),
    ]
}

/// Median cycle time of the analysed spans, `None` when there are none.
pub fn median_cycle_time(result: &AnalysisResult) -> Option<f64> {
    let sample = match result.metadata.granularity {
        Granularity::Activities => sorted_cycle_times(&result.activities),
        Granularity::Projects => sorted_cycle_times(&result.projects),
    };
    if sample.is_empty() {
        None
    } else {
        Some(percentile(&sample, 50.0))
    }
}

// ── Views ─────────────────────────────────────────────────────────────────────

/// The overview printed by `--view summary`.
pub fn summary_report(result: &AnalysisResult) -> String {
    let meta = &result.metadata;
    let mut lines = vec![
        "Flow Metrics".to_string(),
        "=".repeat(60),
        format!("Log records:        {}", meta.records_read),
    ];
    if meta.invalid_timestamps > 0 {
        lines.push(format!(
            "Skipped records:    {} (unparseable timestamp)",
            meta.invalid_timestamps
        ));
    }
    lines.push(format!("Timesheet rows:     {}", meta.timesheet_rows));
    lines.push(format!(
        "Hours logged:       {}",
        format_hours(result.total_hours())
    ));
    lines.push(format!("Activities:         {}", result.activities.len()));
    lines.push(format!("Projects:           {}", result.projects.len()));
    lines.push(format!("Granularity:        {}", meta.granularity));

    if let (Some(first), Some(last)) = (result.burn_up.first(), result.burn_up.last()) {
        lines.push(format!("Date range:         {} → {}", first.date, last.date));
    }

    lines.push(String::new());
    if let Some(summary) = BurnUpSummary::from_rows(&result.burn_up) {
        lines.extend(burn_up_summary_lines(&summary));
    }
    if let Some(median) = median_cycle_time(result) {
        let days = median.round() as u32;
        lines.push(format!("Median cycle time: {}", format_days(days)));
    }
    lines.push(cycle_time_sentence(&result.cycle_times, meta.granularity));
    lines.push(throughput_sentence(&result.throughput));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Text for one `--view` value; `None` for `chart` and unknown names.
pub fn view_report(view: &str, result: &AnalysisResult) -> Option<String> {
    let text = match view {
        "summary" => summary_report(result),
        "timesheet" => render_plain(&timesheet_table(&result.timesheet)),
        "activities" => render_plain(&activities_table(&result.activities)),
        "projects" => render_plain(&projects_table(&result.projects)),
        "burn-up" => {
            let mut text = render_plain(&burn_up_table(&result.burn_up));
            if let Some(summary) = BurnUpSummary::from_rows(&result.burn_up) {
                text.push('\n');
                for line in burn_up_summary_lines(&summary) {
                    text.push_str(&line);
                    text.push('\n');
                }
            }
            text
        }
        "cycle-times" => {
            let mut text =
                render_plain(&statistics_table("Cycle Times", "Cycle Time", &result.cycle_times));
            text.push('\n');
            text.push_str(&cycle_time_sentence(
                &result.cycle_times,
                result.metadata.granularity,
            ));
            text.push('\n');
            text
        }
        "throughput" => {
            let mut text =
                render_plain(&statistics_table("Throughput", "Throughput", &result.throughput));
            text.push('\n');
            text.push_str(&throughput_sentence(&result.throughput));
            text.push('\n');
            text
        }
        _ => return None,
    };
    Some(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flow_core::models::{Activity, BurnUpRow, ProjectSpan, TimesheetRow};
    use flow_data::analysis::AnalysisMetadata;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn stat(value: u32, count: usize, cumulative: f64) -> FlowStatistic {
        FlowStatistic {
            value,
            count,
            probability: 0.0,
            cumulative_probability: cumulative,
        }
    }

    fn activity(task: &str, start: &str, end: &str, cycle_time: u32) -> Activity {
        Activity {
            client: "ACME".to_string(),
            project: "Website".to_string(),
            task: task.to_string(),
            start_date: date(start),
            end_date: date(end),
            cycle_time,
        }
    }

    fn make_result() -> AnalysisResult {
        AnalysisResult {
            timesheet: vec![TimesheetRow {
                date: date("2024-01-01"),
                client: "ACME".to_string(),
                project: "Website".to_string(),
                task: "Login".to_string(),
                category: "Dev".to_string(),
                hours: 2.5,
            }],
            activities: vec![
                activity("Login", "2024-01-01", "2024-01-02", 2),
                activity("Signup", "2024-01-02", "2024-01-04", 3),
                activity("Logout", "2024-01-03", "2024-01-03", 1),
            ],
            projects: vec![ProjectSpan {
                client: "ACME".to_string(),
                project: "Website".to_string(),
                start_date: date("2024-01-01"),
                end_date: date("2024-01-04"),
                cycle_time: 4,
            }],
            burn_up: vec![
                BurnUpRow {
                    date: date("2024-01-01"),
                    wip: 1,
                    done: 0,
                },
                BurnUpRow {
                    date: date("2024-01-04"),
                    wip: 1,
                    done: 3,
                },
            ],
            cycle_times: vec![stat(1, 1, 1.0 / 3.0), stat(2, 1, 2.0 / 3.0), stat(3, 1, 1.0)],
            throughput: vec![stat(0, 1, 0.25), stat(1, 3, 1.0)],
            metadata: AnalysisMetadata {
                generated_at: "2024-01-05T00:00:00Z".to_string(),
                records_read: 4,
                invalid_timestamps: 1,
                timesheet_rows: 1,
                spans_analyzed: 3,
                granularity: Granularity::Activities,
                load_time_seconds: 0.0,
                transform_time_seconds: 0.0,
            },
        }
    }

    // ── render_plain ──────────────────────────────────────────────────────────

    #[test]
    fn test_render_plain_alignment() {
        let table = burn_up_table(&[
            BurnUpRow {
                date: date("2024-01-01"),
                wip: 12,
                done: 0,
            },
            BurnUpRow {
                date: date("2024-01-02"),
                wip: 3,
                done: 100,
            },
        ]);
        let text = render_plain(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Burn-up");
        assert_eq!(lines[1], "Date        WIP  Done");
        assert_eq!(lines[2], "----------  ---  ----");
        assert_eq!(lines[3], "2024-01-01   12     0");
        assert_eq!(lines[4], "2024-01-02    3   100");
    }

    #[test]
    fn test_render_plain_unicode_width() {
        let mut table = activities_table(&[activity("Login", "2024-01-01", "2024-01-01", 1)]);
        table.rows[0][0] = "日本".to_string();
        let text = render_plain(&table);
        let lines: Vec<&str> = text.lines().collect();
        // "日本" is four columns wide; padded to "Client" (six) plus the gap.
        assert!(lines[3].starts_with("日本    Website"), "got: {}", lines[3]);
    }

    #[test]
    fn test_render_plain_empty_table() {
        let text = render_plain(&activities_table(&[]));
        assert!(text.contains("(no rows)"));
    }

    #[test]
    fn test_render_plain_totals_row_last() {
        let result = make_result();
        let text = render_plain(&timesheet_table(&result.timesheet));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("TOTAL"), "got: {last}");
        assert!(last.ends_with("2.50"), "got: {last}");
    }

    // ── Sentences ─────────────────────────────────────────────────────────────

    #[test]
    fn test_cycle_time_sentence() {
        let stats = vec![stat(1, 2, 2.0 / 6.0), stat(2, 3, 5.0 / 6.0), stat(3, 1, 1.0)];
        assert_eq!(
            cycle_time_sentence(&stats, Granularity::Activities),
            "85% of activities are completed within 3 days."
        );
        assert_eq!(
            cycle_time_sentence(&stats, Granularity::Projects),
            "85% of projects are completed within 3 days."
        );
    }

    #[test]
    fn test_cycle_time_sentence_undetermined() {
        assert_eq!(
            cycle_time_sentence(&[], Granularity::Activities),
            "Could not determine the 85% threshold for cycle times."
        );
    }

    #[test]
    fn test_throughput_sentence() {
        let stats = vec![stat(0, 2, 0.5), stat(1, 1, 0.75), stat(2, 1, 1.0)];
        assert_eq!(
            throughput_sentence(&stats),
            "85% of days have a maximal throughput of 2."
        );
        assert_eq!(
            throughput_sentence(&[]),
            "Could not determine the 85% threshold for throughput."
        );
    }

    #[test]
    fn test_burn_up_summary_lines() {
        let lines = burn_up_summary_lines(&BurnUpSummary {
            days: 12,
            throughput: 7,
        });
        assert_eq!(lines[0], "Cycle Time: 12 days");
        assert_eq!(lines[1], "Throughput: 7 tasks");
    }

    #[test]
    fn test_median_cycle_time() {
        let mut result = make_result();
        assert_eq!(median_cycle_time(&result), Some(2.0));

        result.metadata.granularity = Granularity::Projects;
        assert_eq!(median_cycle_time(&result), Some(4.0));

        result.projects.clear();
        assert_eq!(median_cycle_time(&result), None);
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_report_contents() {
        let text = summary_report(&make_result());
        assert!(text.contains("Log records:        4"));
        assert!(text.contains("Skipped records:    1"));
        assert!(text.contains("Hours logged:       2.50"));
        assert!(text.contains("Date range:         2024-01-01 → 2024-01-04"));
        assert!(text.contains("Cycle Time: 4 days"));
        assert!(text.contains("Throughput: 3 tasks"));
        assert!(text.contains("Median cycle time: 2 days"));
        assert!(text.contains("85% of activities are completed within 3 days."));
        assert!(text.contains("85% of days have a maximal throughput of 1."));
    }

    #[test]
    fn test_view_report_known_views() {
        let result = make_result();
        for view in [
            "summary",
            "timesheet",
            "activities",
            "projects",
            "burn-up",
            "cycle-times",
            "throughput",
        ] {
            assert!(view_report(view, &result).is_some(), "view {view}");
        }
        assert!(view_report("chart", &result).is_none());
    }

    #[test]
    fn test_view_report_cycle_times_has_sentence() {
        let text = view_report("cycle-times", &make_result()).unwrap();
        assert!(text.starts_with("Cycle Times\n"));
        assert!(text.contains("Cycle Time  Count  Probability  Cumulative Probability"));
        assert!(text.trim_end().ends_with("within 3 days."));
    }
}
