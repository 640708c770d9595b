mod bootstrap;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use flow_core::models::Granularity;
use flow_core::settings::Settings;
use flow_data::analysis::{analyze_log, AnalysisResult};
use flow_data::export::{write_harvest_timesheet, write_statistics, write_table, OutputFormat};
use flow_data::filter::TimesheetFilter;
use flow_ui::app::{App, ViewMode};
use flow_ui::report::view_report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("flow-metrics v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Granularity: {}, Theme: {}",
        settings.view,
        settings.granularity,
        settings.theme
    );

    if settings.clear && settings.log.is_none() {
        eprintln!("Cleared saved parameters.");
        return Ok(());
    }

    let Some(log) = settings.log.clone() else {
        bail!("No activity log given. Pass the CSV path as the first argument.");
    };

    let filter = build_filter(&settings)?;
    let granularity: Granularity = settings
        .granularity
        .parse()
        .map_err(anyhow::Error::msg)?;

    let result = analyze_log(&log, &filter, granularity)
        .with_context(|| format!("Failed to analyse {}", log.display()))?;

    if let Some(path) = &settings.export {
        write_harvest_timesheet(
            &result.timesheet,
            path,
            settings.first_name.as_deref().unwrap_or_default(),
            settings.last_name.as_deref().unwrap_or_default(),
        )?;
        eprintln!(
            "Wrote {} timesheet rows to {}",
            result.timesheet.len(),
            path.display()
        );
    }

    if let Some(path) = &settings.output {
        let format: OutputFormat = settings.format.parse()?;
        write_output(&settings.view, &result, format, path)?;
        eprintln!("Wrote {} view to {}", settings.view, path.display());
    }

    match settings.view.as_str() {
        "chart" => {
            tracing::info!("Starting chart view...");
            App::new(&settings.theme, ViewMode::BurnUp, result).run()?;
        }
        view => match view_report(view, &result) {
            Some(text) => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
            None => eprintln!("Unknown view mode: {}", view),
        },
    }

    Ok(())
}

/// Translate the `--from/--to/--client/...` options into a filter.
fn build_filter(settings: &Settings) -> Result<TimesheetFilter> {
    let mut filter = TimesheetFilter::new()
        .clients(settings.clients.iter().cloned())
        .projects(settings.projects.iter().cloned())
        .tasks(settings.tasks.iter().cloned())
        .categories(settings.categories.iter().cloned());
    if let Some(from) = &settings.from {
        filter = filter.from_date(from)?;
    }
    if let Some(to) = &settings.to {
        filter = filter.to_date(to)?;
    }
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            bail!("--from {} is after --to {}", start, end);
        }
    }
    Ok(filter)
}

/// Write the table behind `view` to `path` in `format`.
fn write_output(view: &str, result: &AnalysisResult, format: OutputFormat, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_view(view, result, format, file)
}

fn write_view<W: Write>(
    view: &str,
    result: &AnalysisResult,
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    match view {
        "summary" => write_table(std::slice::from_ref(&result.metadata), format, writer)?,
        "timesheet" => write_table(&result.timesheet, format, writer)?,
        "activities" => write_table(&result.activities, format, writer)?,
        "projects" => write_table(&result.projects, format, writer)?,
        "burn-up" | "chart" => write_table(&result.burn_up, format, writer)?,
        "cycle-times" => write_statistics(&result.cycle_times, "Cycle Time", format, writer)?,
        "throughput" => write_statistics(&result.throughput, "Throughput", format, writer)?,
        other => bail!("Unknown view mode: {}", other),
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
