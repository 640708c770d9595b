//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, the current view and the analysis result. It
//! renders one view at a time; `Tab` cycles forward, `Shift+Tab` backward.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame, Terminal,
};

use flow_data::analysis::AnalysisResult;

use crate::chart_view;
use crate::components::header::Header;
use crate::table_view::{self, activities_table, projects_table};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    BurnUp,
    CycleTimes,
    Throughput,
    /// Activity or project table, following the analysis granularity.
    Spans,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::BurnUp,
        ViewMode::CycleTimes,
        ViewMode::Throughput,
        ViewMode::Spans,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::BurnUp => "Burn-up",
            ViewMode::CycleTimes => "Cycle Times",
            ViewMode::Throughput => "Throughput",
            ViewMode::Spans => "Spans",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the flow-metrics TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    pub result: AnalysisResult,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode, result: AnalysisResult) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            should_quit: false,
            result,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the chart TUI until `q`, `Q`, `Esc` or `Ctrl+C`.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.view_mode = self.view_mode.next(),
            KeyCode::BackTab | KeyCode::Left => self.view_mode = self.view_mode.previous(),
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let granularity = self.result.metadata.granularity.to_string();
        let range = self.date_range();
        let header = Header::new(&granularity, &range, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);
        frame.render_widget(Paragraph::new(self.tabs_line()), chunks[1]);

        let body = chunks[2];
        if self.result.burn_up.is_empty() {
            table_view::render_no_data(frame, body, &self.theme);
        } else {
            match self.view_mode {
                ViewMode::BurnUp => {
                    chart_view::render_burn_up(frame, body, &self.result.burn_up, &self.theme)
                }
                ViewMode::CycleTimes => chart_view::render_histogram(
                    frame,
                    body,
                    "Cycle Times",
                    "days",
                    &self.result.cycle_times,
                    &self.theme,
                ),
                ViewMode::Throughput => chart_view::render_histogram(
                    frame,
                    body,
                    "Throughput",
                    "tasks",
                    &self.result.throughput,
                    &self.theme,
                ),
                ViewMode::Spans => {
                    let table = match self.result.metadata.granularity {
                        flow_core::models::Granularity::Activities => {
                            activities_table(&self.result.activities)
                        }
                        flow_core::models::Granularity::Projects => {
                            projects_table(&self.result.projects)
                        }
                    };
                    table_view::render_table_view(frame, body, &table, &self.theme);
                }
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab/Shift+Tab: switch view   q: quit",
                self.theme.dim,
            ))),
            chunks[3],
        );
    }

    /// One span per view, the current one highlighted.
    pub fn tabs_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, mode) in ViewMode::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", self.theme.separator));
            }
            let style = if *mode == self.view_mode {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            spans.push(Span::styled(mode.title(), style));
        }
        Line::from(spans)
    }

    fn date_range(&self) -> String {
        match (self.result.burn_up.first(), self.result.burn_up.last()) {
            (Some(first), Some(last)) => format!("{} → {}", first.date, last.date),
            _ => "no data".to_string(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flow_core::models::{Activity, BurnUpRow, FlowStatistic, Granularity};
    use flow_data::analysis::AnalysisMetadata;
    use ratatui::backend::TestBackend;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_result() -> AnalysisResult {
        AnalysisResult {
            timesheet: vec![],
            activities: vec![Activity {
                client: "ACME".to_string(),
                project: "Website".to_string(),
                task: "Login".to_string(),
                start_date: date("2024-01-01"),
                end_date: date("2024-01-02"),
                cycle_time: 2,
            }],
            projects: vec![],
            burn_up: vec![
                BurnUpRow {
                    date: date("2024-01-01"),
                    wip: 1,
                    done: 0,
                },
                BurnUpRow {
                    date: date("2024-01-02"),
                    wip: 1,
                    done: 1,
                },
            ],
            cycle_times: vec![FlowStatistic {
                value: 2,
                count: 1,
                probability: 1.0,
                cumulative_probability: 1.0,
            }],
            throughput: vec![
                FlowStatistic {
                    value: 0,
                    count: 1,
                    probability: 0.5,
                    cumulative_probability: 0.5,
                },
                FlowStatistic {
                    value: 1,
                    count: 1,
                    probability: 0.5,
                    cumulative_probability: 1.0,
                },
            ],
            metadata: AnalysisMetadata {
                generated_at: "2024-01-03T00:00:00Z".to_string(),
                records_read: 2,
                invalid_timestamps: 0,
                timesheet_rows: 2,
                spans_analyzed: 1,
                granularity: Granularity::Activities,
                load_time_seconds: 0.0,
                transform_time_seconds: 0.0,
            },
        }
    }

    fn empty_result() -> AnalysisResult {
        let mut result = make_result();
        result.activities.clear();
        result.burn_up.clear();
        result.cycle_times.clear();
        result.throughput.clear();
        result
    }

    fn draw(app: &App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    // ── ViewMode ──────────────────────────────────────────────────────────────

    #[test]
    fn test_view_mode_next_cycles() {
        let mut mode = ViewMode::BurnUp;
        for expected in [
            ViewMode::CycleTimes,
            ViewMode::Throughput,
            ViewMode::Spans,
            ViewMode::BurnUp,
        ] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }

    #[test]
    fn test_view_mode_previous_wraps() {
        assert_eq!(ViewMode::BurnUp.previous(), ViewMode::Spans);
        assert_eq!(ViewMode::Spans.previous(), ViewMode::Throughput);
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", ViewMode::BurnUp, make_result());
        assert_eq!(app.view_mode, ViewMode::BurnUp);
        assert!(!app.should_quit);
        assert_eq!(app.result.activities.len(), 1);
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("neon", ViewMode::Throughput, make_result());
        assert_eq!(app.view_mode, ViewMode::Throughput);
        assert!(app.theme.header.fg.is_some());
    }

    // ── handle_key ────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_switches_view() {
        let mut app = App::new("dark", ViewMode::BurnUp, make_result());
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view_mode, ViewMode::CycleTimes);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.view_mode, ViewMode::BurnUp);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.view_mode, ViewMode::Spans);
    }

    #[test]
    fn test_q_quits() {
        let mut app = App::new("dark", ViewMode::BurnUp, make_result());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new("dark", ViewMode::BurnUp, make_result());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_plain_c_does_not_quit() {
        let mut app = App::new("dark", ViewMode::BurnUp, make_result());
        app.handle_key(key(KeyCode::Char('c')));
        assert!(!app.should_quit);
        assert_eq!(app.view_mode, ViewMode::BurnUp);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_tabs_line_lists_every_view() {
        let app = App::new("dark", ViewMode::Throughput, make_result());
        let line = app.tabs_line();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Burn-up | Cycle Times | Throughput | Spans");
        let active = line
            .spans
            .iter()
            .find(|s| s.content == "Throughput")
            .unwrap();
        assert_eq!(active.style, app.theme.tab_active);
    }

    #[test]
    fn test_render_every_view_does_not_panic() {
        for mode in ViewMode::ALL {
            let app = App::new("dark", mode, make_result());
            draw(&app);
        }
    }

    #[test]
    fn test_render_projects_granularity_does_not_panic() {
        let mut result = make_result();
        result.metadata.granularity = Granularity::Projects;
        let app = App::new("light", ViewMode::Spans, result);
        draw(&app);
    }

    #[test]
    fn test_render_empty_result_does_not_panic() {
        let app = App::new("classic", ViewMode::BurnUp, empty_result());
        draw(&app);
    }
}
