//! Burn-up chart and frequency histograms.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use flow_core::models::{BurnUpRow, FlowStatistic};
use flow_core::percentile::{percentile_threshold, FORECAST_THRESHOLD};
use flow_data::analyzer::{ideal_burn_up, BurnUpSummary};

use crate::components::probability_bar::ProbabilityBar;
use crate::themes::Theme;

/// Line series of a burn-up chart, x = day offset from the first date.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnUpSeries {
    pub done: Vec<(f64, f64)>,
    /// Done + WIP, stacked on top of the done line.
    pub done_plus_wip: Vec<(f64, f64)>,
    pub ideal: Vec<(f64, f64)>,
    pub y_max: f64,
}

impl BurnUpSeries {
    pub fn from_rows(rows: &[BurnUpRow]) -> Self {
        let done: Vec<(f64, f64)> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.done as f64))
            .collect();
        let done_plus_wip: Vec<(f64, f64)> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, (r.done + r.wip) as f64))
            .collect();
        let ideal = match ideal_burn_up(rows) {
            Some([(_, start), (_, end)]) => {
                vec![(0.0, start as f64), ((rows.len() - 1) as f64, end as f64)]
            }
            None => Vec::new(),
        };
        let y_max = done_plus_wip.iter().map(|(_, y)| *y).fold(1.0, f64::max);
        Self {
            done,
            done_plus_wip,
            ideal,
            y_max,
        }
    }

    pub fn x_max(&self) -> f64 {
        (self.done.len().saturating_sub(1) as f64).max(1.0)
    }
}

/// Render the burn-up chart with its "Cycle Time / Throughput" footer.
pub fn render_burn_up(frame: &mut Frame, area: Rect, rows: &[BurnUpRow], theme: &Theme) {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        render_empty(frame, area, "Burn-up", theme);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let series = BurnUpSeries::from_rows(rows);
    let datasets = vec![
        Dataset::default()
            .name("Done + WIP")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.chart_wip)
            .data(&series.done_plus_wip),
        Dataset::default()
            .name("Done")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.chart_done)
            .data(&series.done),
        Dataset::default()
            .name("Ideal")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(theme.chart_ideal)
            .data(&series.ideal),
    ];

    let x_labels = vec![
        Span::styled(first.date.to_string(), theme.chart_axis),
        Span::styled(last.date.to_string(), theme.chart_axis),
    ];
    let y_labels = vec![
        Span::styled("0", theme.chart_axis),
        Span::styled(format!("{}", series.y_max as usize), theme.chart_axis),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Burn-up "),
        )
        .x_axis(
            Axis::default()
                .title("Date")
                .style(theme.chart_axis)
                .bounds([0.0, series.x_max()])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Tasks")
                .style(theme.chart_axis)
                .bounds([0.0, series.y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, chunks[0]);

    if let Some(summary) = BurnUpSummary::from_rows(rows) {
        frame.render_widget(Paragraph::new(summary_line(&summary, theme)), chunks[1]);
    }
}

/// `Cycle Time: N days    Throughput: N tasks`
pub fn summary_line<'a>(summary: &BurnUpSummary, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled("Cycle Time: ", theme.label),
        Span::styled(format!("{} days", summary.days), theme.value),
        Span::raw("    "),
        Span::styled("Throughput: ", theme.label),
        Span::styled(format!("{} tasks", summary.throughput), theme.value),
    ])
}

/// Render a frequency histogram.
///
/// Each bar is labelled with its value and shows its count; the bar at the
/// 85th-percentile threshold is highlighted and the footer shows the
/// threshold with its cumulative probability.
pub fn render_histogram(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    unit: &str,
    stats: &[FlowStatistic],
    theme: &Theme,
) {
    if stats.is_empty() {
        render_empty(frame, area, title, theme);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let threshold = percentile_threshold(stats, FORECAST_THRESHOLD);
    let bars: Vec<Bar> = stats
        .iter()
        .map(|s| {
            Bar::default()
                .value(s.count as u64)
                .label(Line::from(s.value.to_string()))
                .text_value(s.count.to_string())
                .style(theme.bar_style(s.value, threshold))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(histogram_bar_width(area.width, stats.len()))
        .bar_gap(1)
        .value_style(theme.value.reversed());
    frame.render_widget(chart, chunks[0]);

    frame.render_widget(
        Paragraph::new(threshold_line(stats, threshold, unit, theme)),
        chunks[1],
    );
}

/// Footer of a histogram: the 85% threshold and a cumulative-probability bar.
pub fn threshold_line<'a>(
    stats: &[FlowStatistic],
    threshold: Option<u32>,
    unit: &str,
    theme: &'a Theme,
) -> Line<'a> {
    let Some(value) = threshold else {
        return Line::from(Span::styled(
            "85% threshold: undetermined",
            theme.warning,
        ));
    };
    let cumulative = stats
        .iter()
        .find(|s| s.value == value)
        .map(|s| s.cumulative_probability)
        .unwrap_or(1.0);

    let mut spans = vec![
        Span::styled("85% threshold: ", theme.label),
        Span::styled(format!("{} {}  ", value, unit), theme.bar_threshold),
    ];
    spans.extend(ProbabilityBar::new(cumulative, theme).to_line().spans);
    Line::from(spans)
}

/// Widest bar that still fits `count` bars (plus gaps) into `width` columns.
pub fn histogram_bar_width(width: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let inner = width.saturating_sub(2) as usize;
    let per_bar = inner / count;
    per_bar.saturating_sub(1).clamp(1, 9) as u16
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("No data", theme.dim))).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
