//! Writers for the Harvest timesheet import format and for tabular output.

use std::io::Write;
use std::path::Path;

use flow_core::error::{FlowError, Result};
use flow_core::models::{Columns, FlowStatistic, TimesheetRow};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One row of a Harvest timesheet import.
///
/// Harvest has no separate category column, so the log's category becomes the
/// Harvest task and the log's task moves into the notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRow {
    #[serde(rename = "Date")]
    pub date: chrono::NaiveDate,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Hours")]
    pub hours: f64,
    #[serde(rename = "First name")]
    pub first_name: String,
    #[serde(rename = "Last name")]
    pub last_name: String,
}

impl Columns for HarvestRow {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Client",
        "Project",
        "Task",
        "Notes",
        "Hours",
        "First name",
        "Last name",
    ];
}

/// Map timesheet rows to Harvest rows, preserving order.
pub fn to_harvest(rows: &[TimesheetRow], first_name: &str, last_name: &str) -> Vec<HarvestRow> {
    rows.iter()
        .map(|row| HarvestRow {
            date: row.date,
            client: row.client.clone(),
            project: row.project.clone(),
            task: row.category.clone(),
            notes: row.task.clone(),
            hours: row.hours,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
        .collect()
}

/// Write `rows` as a Harvest import CSV at `path`.
pub fn write_harvest_timesheet(
    rows: &[TimesheetRow],
    path: &Path,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(&to_harvest(rows, first_name, last_name), file)?;
    info!("Wrote {} Harvest rows to {}", rows.len(), path.display());
    Ok(())
}

// ── Tabular output ────────────────────────────────────────────────────────────

/// Serialization format for `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(FlowError::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// Serialize `rows` under the `T::COLUMNS` header.
///
/// The header is written even when `rows` is empty.
pub fn write_csv<T: Serialize + Columns, W: Write>(rows: &[T], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(T::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serialize `rows` as a pretty-printed JSON array.
pub fn write_json<T: Serialize, W: Write>(rows: &[T], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}

/// Write `rows` in the requested format.
pub fn write_table<T: Serialize + Columns, W: Write>(
    rows: &[T],
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(rows, writer),
        OutputFormat::Json => write_json(rows, writer),
    }
}

/// Write a cycle-time or throughput table.
///
/// `value_header` names the first column, e.g. `"Cycle Time"` or
/// `"Throughput"`.
pub fn write_statistics<W: Write>(
    stats: &[FlowStatistic],
    value_header: &str,
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            wtr.write_record([value_header, "Count", "Probability", "Cumulative Probability"])?;
            for s in stats {
                wtr.write_record(&[
                    s.value.to_string(),
                    s.count.to_string(),
                    s.probability.to_string(),
                    s.cumulative_probability.to_string(),
                ])?;
            }
            wtr.flush()?;
            Ok(())
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = stats
                .iter()
                .map(|s| {
                    serde_json::json!({
                        value_header: s.value,
                        "Count": s.count,
                        "Probability": s.probability,
                        "Cumulative Probability": s.cumulative_probability,
                    })
                })
                .collect();
            write_json(&rows, writer)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
