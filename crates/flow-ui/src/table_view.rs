//! Table views for timesheets, spans and frequency tables.
//!
//! Each builder turns analysis output into a [`TableData`]: a title, column
//! headers, pre-formatted cells and an optional totals row. The same value is
//! rendered by the TUI ([`render_table_view`]) and by the plain-text report.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use flow_core::formatting;
use flow_core::models::{Activity, BurnUpRow, FlowStatistic, ProjectSpan, TimesheetRow};

use crate::themes::Theme;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A pre-formatted table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub title: String,
    pub headers: Vec<String>,
    pub align: Vec<Align>,
    pub rows: Vec<Vec<String>>,
    /// Highlighted last row, e.g. hour totals.
    pub totals: Option<Vec<String>>,
}

impl TableData {
    fn new(title: &str, columns: &[(&str, Align)]) -> Self {
        Self {
            title: title.to_string(),
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            align: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
            totals: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display width of every column: the widest of header, cells and totals.
    pub fn column_widths(&self) -> Vec<usize> {
        use unicode_width::UnicodeWidthStr;

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in self.rows.iter().chain(self.totals.iter()) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }
        widths
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Timesheet rows with an hours total.
pub fn timesheet_table(rows: &[TimesheetRow]) -> TableData {
    let mut table = TableData::new(
        "Timesheet",
        &[
            ("Date", Align::Left),
            ("Client", Align::Left),
            ("Project", Align::Left),
            ("Task", Align::Left),
            ("Category", Align::Left),
            ("Hours", Align::Right),
        ],
    );
    table.rows = rows
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.client.clone(),
                r.project.clone(),
                r.task.clone(),
                r.category.clone(),
                formatting::format_hours(r.hours),
            ]
        })
        .collect();
    let total: f64 = rows.iter().map(|r| r.hours).sum();
    table.totals = Some(vec![
        "TOTAL".to_string(),
        format!("{} rows", rows.len()),
        String::new(),
        String::new(),
        String::new(),
        formatting::format_hours(total),
    ]);
    table
}

/// One row per activity.
pub fn activities_table(activities: &[Activity]) -> TableData {
    let mut table = TableData::new(
        "Activities",
        &[
            ("Client", Align::Left),
            ("Project", Align::Left),
            ("Task", Align::Left),
            ("Start Date", Align::Left),
            ("End Date", Align::Left),
            ("Cycle Time", Align::Right),
        ],
    );
    table.rows = activities
        .iter()
        .map(|a| {
            vec![
                a.client.clone(),
                a.project.clone(),
                a.task.clone(),
                a.start_date.to_string(),
                a.end_date.to_string(),
                a.cycle_time.to_string(),
            ]
        })
        .collect();
    table
}

/// One row per project span.
pub fn projects_table(projects: &[ProjectSpan]) -> TableData {
    let mut table = TableData::new(
        "Projects",
        &[
            ("Client", Align::Left),
            ("Project", Align::Left),
            ("Start Date", Align::Left),
            ("End Date", Align::Left),
            ("Cycle Time", Align::Right),
        ],
    );
    table.rows = projects
        .iter()
        .map(|p| {
            vec![
                p.client.clone(),
                p.project.clone(),
                p.start_date.to_string(),
                p.end_date.to_string(),
                p.cycle_time.to_string(),
            ]
        })
        .collect();
    table
}

/// Burn-up rows, one per day.
pub fn burn_up_table(rows: &[BurnUpRow]) -> TableData {
    let mut table = TableData::new(
        "Burn-up",
        &[
            ("Date", Align::Left),
            ("WIP", Align::Right),
            ("Done", Align::Right),
        ],
    );
    table.rows = rows
        .iter()
        .map(|r| vec![r.date.to_string(), r.wip.to_string(), r.done.to_string()])
        .collect();
    table
}

/// Frequency table; `value_header` is `"Cycle Time"` or `"Throughput"`.
pub fn statistics_table(title: &str, value_header: &str, stats: &[FlowStatistic]) -> TableData {
    let mut table = TableData::new(
        title,
        &[
            (value_header, Align::Right),
            ("Count", Align::Right),
            ("Probability", Align::Right),
            ("Cumulative Probability", Align::Right),
        ],
    );
    table.rows = stats
        .iter()
        .map(|s| {
            vec![
                s.value.to_string(),
                s.count.to_string(),
                formatting::format_probability(s.probability),
                formatting::format_probability(s.cumulative_probability),
            ]
        })
        .collect();
    table
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render `table` into `area` as a bordered [`Table`] with alternating row
/// styles and a highlighted totals row.
pub fn render_table_view(frame: &mut Frame, area: Rect, table: &TableData, theme: &Theme) {
    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            Row::new(cells.iter().map(|c| Cell::from(c.clone()))).style(theme.row_style(i))
        })
        .collect();

    if let Some(totals) = &table.totals {
        rows.push(Row::new(totals.iter().map(|c| Cell::from(c.clone()))).style(theme.table_total));
    }

    let widths: Vec<Constraint> = table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(w as u16 + 2))
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", table.title)),
        )
        .style(theme.text);

    frame.render_widget(widget, area);
}

/// Render a "no data" placeholder when the filtered log is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No activities found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check the log path and the --from/--to and --client filters.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text))
            .block(Block::default().borders(Borders::ALL).title(" Flow Metrics ")),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
