use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single work entry read from the activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// UTC instant of the entry, `None` when the source text was unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Elapsed time spent on the entry.
    pub duration: chrono::Duration,
    pub client: String,
    pub project: String,
    pub task: String,
    pub category: String,
    /// Free-form notes; an empty cell becomes `""`.
    pub notes: String,
}

impl LogRecord {
    /// Calendar day (UTC) the entry belongs to.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }
}

/// Row types with a fixed column layout for tabular output.
///
/// `COLUMNS` lists the serde names in field order so that a header can be
/// written even when there are no rows to serialize.
pub trait Columns {
    const COLUMNS: &'static [&'static str];
}

/// Hours worked on one day for one (client, project, task, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Category")]
    pub category: String,
    /// Summed durations in hours, rounded to two decimals.
    #[serde(rename = "Hours")]
    pub hours: f64,
}

/// A contiguous unit of work per (client, project, task).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Start Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "End Date")]
    pub end_date: NaiveDate,
    /// Inclusive day count, `end - start + 1`.
    #[serde(rename = "Cycle Time")]
    pub cycle_time: u32,
}

/// Span of all activities of one project of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpan {
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Start Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "End Date")]
    pub end_date: NaiveDate,
    #[serde(rename = "Cycle Time")]
    pub cycle_time: u32,
}

impl Columns for TimesheetRow {
    const COLUMNS: &'static [&'static str] =
        &["Date", "Client", "Project", "Task", "Category", "Hours"];
}

impl Columns for Activity {
    const COLUMNS: &'static [&'static str] = &[
        "Client",
        "Project",
        "Task",
        "Start Date",
        "End Date",
        "Cycle Time",
    ];
}

impl Columns for ProjectSpan {
    const COLUMNS: &'static [&'static str] =
        &["Client", "Project", "Start Date", "End Date", "Cycle Time"];
}

/// Anything with a start and end day that the flow analyzers can consume.
pub trait Span {
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
    fn cycle_time(&self) -> u32;
    /// Human-readable identity used in error messages.
    fn label(&self) -> String;
}

impl Span for Activity {
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    fn cycle_time(&self) -> u32 {
        self.cycle_time
    }

    fn label(&self) -> String {
        format!("{} / {} / {}", self.client, self.project, self.task)
    }
}

impl Span for ProjectSpan {
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    fn cycle_time(&self) -> u32 {
        self.cycle_time
    }

    fn label(&self) -> String {
        format!("{} / {}", self.client, self.project)
    }
}

/// Inclusive day count between two dates; `1` for a single-day span.
///
/// Returns `0` when `end` is before `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days();
    if days < 0 {
        0
    } else {
        days as u32 + 1
    }
}

/// One day of a burn-up chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnUpRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Spans in progress on this day.
    #[serde(rename = "WIP")]
    pub wip: usize,
    /// Spans completed on or before this day.
    #[serde(rename = "Done")]
    pub done: usize,
}

/// Number of spans completed on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyThroughput {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Throughput")]
    pub throughput: usize,
}

impl Columns for BurnUpRow {
    const COLUMNS: &'static [&'static str] = &["Date", "WIP", "Done"];
}

impl Columns for DailyThroughput {
    const COLUMNS: &'static [&'static str] = &["Date", "Throughput"];
}

/// One row of a frequency table (cycle times or throughputs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStatistic {
    /// Cycle time in days, or completions per day.
    pub value: u32,
    pub count: usize,
    pub probability: f64,
    pub cumulative_probability: f64,
}

/// Which spans the flow analyzers are run over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One span per (client, project, task).
    #[default]
    Activities,
    /// One span per (client, project).
    Projects,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Activities => write!(f, "activities"),
            Granularity::Projects => write!(f, "projects"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "activities" | "activity" => Ok(Granularity::Activities),
            "projects" | "project" => Ok(Granularity::Projects),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}
