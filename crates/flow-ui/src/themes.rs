use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all styles used by the flow views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub success: Style,
    pub warning: Style,

    // ── Burn-up chart ────────────────────────────────────────────────────────
    pub chart_done: Style,
    /// Done + WIP line.
    pub chart_wip: Style,
    /// Reference line from the first to the last day's done count.
    pub chart_ideal: Style,
    pub chart_axis: Style,

    // ── Histograms ───────────────────────────────────────────────────────────
    /// Bars at or below the 85th-percentile threshold.
    pub bar_within: Style,
    /// Bars above the threshold.
    pub bar_beyond: Style,
    /// The threshold bar itself.
    pub bar_threshold: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,

    // ── Tabs ─────────────────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),

            chart_done: Style::default().fg(Color::Green),
            chart_wip: Style::default().fg(Color::Cyan),
            chart_ideal: Style::default().fg(Color::DarkGray),
            chart_axis: Style::default().fg(Color::Gray),

            bar_within: Style::default().fg(Color::Cyan),
            bar_beyond: Style::default().fg(Color::DarkGray),
            bar_threshold: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so content stays legible on a light canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),

            chart_done: Style::default().fg(Color::Green),
            chart_wip: Style::default().fg(Color::Blue),
            chart_ideal: Style::default().fg(Color::Gray),
            chart_axis: Style::default().fg(Color::DarkGray),

            bar_within: Style::default().fg(Color::Blue),
            bar_beyond: Style::default().fg(Color::Gray),
            bar_threshold: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            tab_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// No bold modifiers, for minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),

            chart_done: Style::default().fg(Color::Green),
            chart_wip: Style::default().fg(Color::Cyan),
            chart_ideal: Style::default().fg(Color::White),
            chart_axis: Style::default().fg(Color::White),

            bar_within: Style::default().fg(Color::Cyan),
            bar_beyond: Style::default().fg(Color::White),
            bar_threshold: Style::default().fg(Color::Yellow),

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),

            tab_active: Style::default().fg(Color::Yellow),
            tab_inactive: Style::default().fg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style for a histogram bar relative to the 85th-percentile threshold.
    ///
    /// With no threshold every bar is `bar_within`.
    pub fn bar_style(&self, value: u32, threshold: Option<u32>) -> Style {
        match threshold {
            Some(t) if value == t => self.bar_threshold,
            Some(t) if value > t => self.bar_beyond,
            _ => self.bar_within,
        }
    }

    /// Alternating row style for tables.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.success.fg, Some(Color::Green));
        assert_eq!(t.warning.fg, Some(Color::Yellow));
        assert_eq!(t.chart_done.fg, Some(Color::Green));
        assert_eq!(t.chart_wip.fg, Some(Color::Cyan));
        assert_eq!(t.bar_threshold.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
        assert_eq!(t.chart_wip.fg, Some(Color::Blue));
    }

    #[test]
    fn test_classic_theme_creation() {
        let t = Theme::classic();
        assert!(!t.value.add_modifier.contains(Modifier::BOLD));
        assert!(!t.bar_threshold.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.table_total.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_from_name_dark() {
        let t = Theme::from_name("dark");
        assert_eq!(t.header.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_from_name_light() {
        let t = Theme::from_name("light");
        assert_eq!(t.header.fg, Some(Color::Blue));
    }

    #[test]
    fn test_from_name_classic() {
        let t = Theme::from_name("classic");
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    // ── bar_style ────────────────────────────────────────────────────────────

    #[test]
    fn test_bar_style_relative_to_threshold() {
        let t = Theme::dark();
        assert_eq!(t.bar_style(1, Some(3)).fg, Some(Color::Cyan));
        assert_eq!(t.bar_style(3, Some(3)).fg, Some(Color::Yellow));
        assert_eq!(t.bar_style(4, Some(3)).fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_bar_style_without_threshold() {
        let t = Theme::dark();
        assert_eq!(t.bar_style(0, None).fg, Some(Color::Cyan));
        assert_eq!(t.bar_style(99, None).fg, Some(Color::Cyan));
    }

    // ── row_style ────────────────────────────────────────────────────────────

    #[test]
    fn test_row_style_alternates() {
        let t = Theme::dark();
        assert_eq!(t.row_style(0).fg, Some(Color::White));
        assert_eq!(t.row_style(1).fg, Some(Color::Gray));
        assert_eq!(t.row_style(2).fg, Some(Color::White));
    }
}
