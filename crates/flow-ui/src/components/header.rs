use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const MARKERS: &str = "▁▃▅▇";

/// Dashboard header rendering four lines:
///
/// 1. Application title with decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Granularity and date range in `[ granularity | range ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// What the analyzers were run over, e.g. "activities".
    pub granularity: &'a str,
    /// Covered date range, e.g. "2024-01-01 → 2024-01-31".
    pub range: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(granularity: &'a str, range: &'a str, theme: &'a Theme) -> Self {
        Self {
            granularity,
            range,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(MARKERS, self.theme.header_accent),
                Span::styled(" FLOW METRICS ", self.theme.header),
                Span::styled(MARKERS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.granularity.to_lowercase(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.range, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let header = Header::new("activities", "2024-01-01 → 2024-01-31", &theme);
        assert_eq!(header.to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new("activities", "", &theme).to_lines();
        let title = text_of(&lines[0]);
        assert!(title.contains("FLOW METRICS"), "got: {title}");
        assert!(title.contains(MARKERS), "got: {title}");
    }

    #[test]
    fn test_header_info_line_format() {
        let theme = Theme::dark();
        let lines = Header::new("Projects", "2024-01-01 → 2024-01-31", &theme).to_lines();
        let info = text_of(&lines[2]);
        assert_eq!(info, "[ projects | 2024-01-01 → 2024-01-31 ]");
    }

    #[test]
    fn test_header_separator_width() {
        let theme = Theme::classic();
        let lines = Header::new("activities", "", &theme).to_lines();
        assert_eq!(text_of(&lines[1]).len(), 60);
    }
}
