//! Aggregation of log records into timesheet rows, activities and projects.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use flow_core::data_processors::round_hours;
use flow_core::error::{FlowError, Result};
use flow_core::models::{inclusive_days, Activity, LogRecord, ProjectSpan, TimesheetRow};
use tracing::debug;

// ── TimesheetAggregator ───────────────────────────────────────────────────────

/// Grouping key of a timesheet row, in output order.
type TimesheetKey = (NaiveDate, String, String, String, String);

/// Stateless helper that buckets log records into daily timesheet rows.
pub struct TimesheetAggregator;

impl TimesheetAggregator {
    /// Group `records` by (UTC date, client, project, task, category) and sum
    /// their durations into hours rounded to two decimals.
    ///
    /// Records without a timestamp are skipped. Rows are sorted by the
    /// grouping key. A group whose summed milliseconds overflow `i64` is a
    /// [`FlowError::DurationOverflow`].
    pub fn aggregate(records: &[LogRecord]) -> Result<Vec<TimesheetRow>> {
        let mut map: BTreeMap<TimesheetKey, i64> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let Some(date) = record.date() else {
                skipped += 1;
                continue;
            };
            let key = (
                date,
                record.client.clone(),
                record.project.clone(),
                record.task.clone(),
                record.category.clone(),
            );
            let total = map.entry(key).or_default();
            *total = total
                .checked_add(record.duration.num_milliseconds())
                .ok_or_else(|| FlowError::DurationOverflow {
                    date,
                    label: format!(
                        "{} / {} / {} / {}",
                        record.client, record.project, record.task, record.category
                    ),
                })?;
        }

        if skipped > 0 {
            debug!("Skipped {} records without timestamp", skipped);
        }

        Ok(map
            .into_iter()
            .map(
                |((date, client, project, task, category), millis)| TimesheetRow {
                    date,
                    client,
                    project,
                    task,
                    category,
                    hours: round_hours(millis),
                },
            )
            .collect())
    }

    /// Sum of hours across `rows`.
    pub fn total_hours(rows: &[TimesheetRow]) -> f64 {
        rows.iter().map(|r| r.hours).sum()
    }
}

// ── ActivityAggregator ────────────────────────────────────────────────────────

/// First and last day seen for one group.
#[derive(Debug, Clone, Copy)]
struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    fn new(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    fn extend(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = self.start.min(start);
        self.end = self.end.max(end);
    }
}

/// Stateless helper that collapses timesheet rows into spans.
pub struct ActivityAggregator;

impl ActivityAggregator {
    /// One [`Activity`] per (client, project, task), spanning the first to
    /// the last day with recorded effort. Sorted by (client, project, task).
    pub fn activities(timesheet: &[TimesheetRow]) -> Vec<Activity> {
        let mut map: BTreeMap<(String, String, String), DateRange> = BTreeMap::new();

        for row in timesheet {
            map.entry((row.client.clone(), row.project.clone(), row.task.clone()))
                .or_insert_with(|| DateRange::new(row.date))
                .extend(row.date, row.date);
        }

        map.into_iter()
            .map(|((client, project, task), range)| Activity {
                client,
                project,
                task,
                start_date: range.start,
                end_date: range.end,
                cycle_time: inclusive_days(range.start, range.end),
            })
            .collect()
    }

    /// One [`ProjectSpan`] per (client, project) over `activities`. Sorted by
    /// (client, project).
    pub fn projects(activities: &[Activity]) -> Vec<ProjectSpan> {
        let mut map: BTreeMap<(String, String), DateRange> = BTreeMap::new();

        for activity in activities {
            map.entry((activity.client.clone(), activity.project.clone()))
                .or_insert_with(|| DateRange::new(activity.start_date))
                .extend(activity.start_date, activity.end_date);
        }

        map.into_iter()
            .map(|((client, project), range)| ProjectSpan {
                client,
                project,
                start_date: range.start,
                end_date: range.end,
                cycle_time: inclusive_days(range.start, range.end),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
