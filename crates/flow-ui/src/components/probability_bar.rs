use crate::themes::Theme;
use flow_core::formatting::format_probability;
use flow_core::percentile::FORECAST_THRESHOLD;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a probability bar.
pub struct BarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 20,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

/// Horizontal bar for a cumulative probability, followed by its percentage.
///
/// The fill switches from `bar_within` to `bar_beyond` once the probability
/// exceeds the forecast threshold.
pub struct ProbabilityBar<'a> {
    /// Clamped to `[0.0, 1.0]`.
    pub probability: f64,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> ProbabilityBar<'a> {
    pub fn new(probability: f64, theme: &'a Theme) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = (self.probability * self.config.width as f64).round() as u16;
        let empty = self.config.width.saturating_sub(filled);

        let style = if self.probability > FORECAST_THRESHOLD {
            self.theme.bar_beyond
        } else {
            self.theme.bar_within
        };

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(filled_str, style),
            Span::styled(empty_str, self.theme.dim),
            Span::styled(
                format!(" {}", format_probability(self.probability)),
                self.theme.label,
            ),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
