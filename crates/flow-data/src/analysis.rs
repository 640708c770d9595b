//! Main analysis pipeline.
//!
//! Orchestrates reading, timesheet aggregation, filtering, activity derivation
//! and the flow analyzers, returning an [`AnalysisResult`] ready for the UI
//! layer.

use std::path::Path;

use chrono::Utc;
use flow_core::error::Result;
use flow_core::models::{
    Activity, BurnUpRow, Columns, FlowStatistic, Granularity, ProjectSpan, Span, TimesheetRow,
};
use tracing::info;

use crate::aggregator::{ActivityAggregator, TimesheetAggregator};
use crate::analyzer::{analyze_burn_up, analyze_cycle_times, analyze_throughput};
use crate::filter::TimesheetFilter;
use crate::reader::read_activity_log;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Data rows read from the log.
    pub records_read: usize,
    /// Rows whose timestamp could not be parsed.
    pub invalid_timestamps: usize,
    /// Timesheet rows left after filtering.
    pub timesheet_rows: usize,
    /// Spans the flow analyzers were run over.
    pub spans_analyzed: usize,
    pub granularity: Granularity,
    /// Wall-clock seconds spent reading the CSV.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent aggregating and analysing.
    pub transform_time_seconds: f64,
}

impl Columns for AnalysisMetadata {
    const COLUMNS: &'static [&'static str] = &[
        "generated_at",
        "records_read",
        "invalid_timestamps",
        "timesheet_rows",
        "spans_analyzed",
        "granularity",
        "load_time_seconds",
        "transform_time_seconds",
    ];
}

/// The complete output of [`analyze_log`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Filtered timesheet.
    pub timesheet: Vec<TimesheetRow>,
    pub activities: Vec<Activity>,
    pub projects: Vec<ProjectSpan>,
    /// Burn-up over the chosen granularity.
    pub burn_up: Vec<BurnUpRow>,
    pub cycle_times: Vec<FlowStatistic>,
    pub throughput: Vec<FlowStatistic>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Sum of hours in the filtered timesheet.
    pub fn total_hours(&self) -> f64 {
        TimesheetAggregator::total_hours(&self.timesheet)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Read the activity log at `path`.
/// 2. Aggregate it into a daily timesheet and apply `filter`.
/// 3. Derive activities and project spans.
/// 4. Run burn-up, cycle-time and throughput analysis over the spans selected
///    by `granularity`.
pub fn analyze_log(
    path: &Path,
    filter: &TimesheetFilter,
    granularity: Granularity,
) -> Result<AnalysisResult> {
    // ── Step 1: Read ──────────────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let outcome = read_activity_log(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2-4: Aggregate and analyse ───────────────────────────────────────
    let transform_start = std::time::Instant::now();
    let timesheet = filter.filter(&TimesheetAggregator::aggregate(&outcome.records)?);
    let activities = ActivityAggregator::activities(&timesheet);
    let projects = ActivityAggregator::projects(&activities);

    let (burn_up, cycle_times, throughput, spans_analyzed) = match granularity {
        Granularity::Activities => run_analyzers(&activities)?,
        Granularity::Projects => run_analyzers(&projects)?,
    };
    let transform_time = transform_start.elapsed().as_secs_f64();

    info!(
        "Analysed {} {} from {} log records in {:.3}s",
        spans_analyzed,
        granularity,
        outcome.records.len(),
        load_time + transform_time
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_read: outcome.records.len(),
        invalid_timestamps: outcome.invalid_timestamps,
        timesheet_rows: timesheet.len(),
        spans_analyzed,
        granularity,
        load_time_seconds: load_time,
        transform_time_seconds: transform_time,
    };

    Ok(AnalysisResult {
        timesheet,
        activities,
        projects,
        burn_up,
        cycle_times,
        throughput,
        metadata,
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

type Analyses = (Vec<BurnUpRow>, Vec<FlowStatistic>, Vec<FlowStatistic>, usize);

fn run_analyzers<S: Span>(spans: &[S]) -> Result<Analyses> {
    Ok((
        analyze_burn_up(spans)?,
        analyze_cycle_times(spans)?,
        analyze_throughput(spans)?,
        spans.len(),
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
