use crate::themes::Theme;
use dividend_core::formatting::{format_currency, format_percent};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual configuration of a share bar.
pub struct ShareBarConfig {
    /// Columns reserved for the label, padded or truncated to fit.
    pub label_width: usize,
    /// Columns of the bar itself.
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ShareBarConfig {
    fn default() -> Self {
        Self {
            label_width: 12,
            width: 30,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ShareBar ──────────────────────────────────────────────────────────────────

/// One distribution slice drawn as `label ████░░░ 66.67% ₹100.00`.
pub struct ShareBar<'a> {
    pub label: &'a str,
    pub amount: f64,
    /// Share of the grand total, clamped to `[0, 100]` when drawn.
    pub percentage: f64,
    pub color: Color,
    pub currency: &'a str,
    pub theme: &'a Theme,
    pub config: ShareBarConfig,
}

impl<'a> ShareBar<'a> {
    pub fn new(
        label: &'a str,
        amount: f64,
        percentage: f64,
        color: Color,
        currency: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            label,
            amount,
            percentage,
            color,
            currency,
            theme,
            config: ShareBarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ShareBarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        let pct = self.percentage.clamp(0.0, 100.0);
        let filled = ((pct / 100.0) * self.config.width as f64).round() as u16;
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let label = format!("{} ", fit_width(self.label, self.config.label_width));
        let figures = format!(
            " {:>7} {}",
            format_percent(self.percentage),
            format_currency(self.amount, self.currency)
        );

        Line::from(vec![
            Span::styled(label, Style::default().fg(self.color)),
            Span::styled(filled_str, Style::default().fg(self.color)),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(figures, self.theme.bar_label),
        ])
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Pad or truncate `s` to exactly `width` display columns.
///
/// Truncated text ends in `…`. Wide characters are measured with their
/// terminal width.
pub fn fit_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current <= width {
        return format!("{}{}", s, " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn bar<'a>(theme: &'a Theme, pct: f64) -> ShareBar<'a> {
        ShareBar::new("INFY", 100.0, pct, Color::Green, "₹", theme).with_config(ShareBarConfig {
            label_width: 6,
            width: 10,
            ..ShareBarConfig::default()
        })
    }

    #[test]
    fn test_share_bar_fill_proportion() {
        let theme = Theme::dark();
        let line = bar(&theme, 40.0).to_line();
        assert_eq!(line.spans[1].content.chars().count(), 4);
        assert_eq!(line.spans[2].content.chars().count(), 6);
    }

    #[test]
    fn test_share_bar_clamps_overflow() {
        let theme = Theme::dark();
        let line = bar(&theme, 250.0).to_line();
        assert_eq!(line.spans[1].content.chars().count(), 10);
        assert!(line.spans[2].content.is_empty());
    }

    #[test]
    fn test_share_bar_label_and_figures() {
        let theme = Theme::dark();
        let text = line_text(&bar(&theme, 66.666_666).to_line());
        assert!(text.starts_with("INFY   "), "got: {text}");
        assert!(text.contains("66.67%"), "got: {text}");
        assert!(text.ends_with("₹100.00"), "got: {text}");
    }

    #[test]
    fn test_share_bar_uses_series_color() {
        let theme = Theme::dark();
        let line = bar(&theme, 50.0).to_line();
        assert_eq!(line.spans[0].style.fg, Some(Color::Green));
        assert_eq!(line.spans[1].style.fg, Some(Color::Green));
    }

    // ── fit_width ─────────────────────────────────────────────────────────────

    #[test]
    fn test_fit_width_pads_short_text() {
        assert_eq!(fit_width("TCS", 6), "TCS   ");
    }

    #[test]
    fn test_fit_width_truncates_long_text() {
        let out = fit_width("BAJAJFINSV", 6);
        assert_eq!(out, "BAJAJ…");
        assert_eq!(UnicodeWidthStr::width(out.as_str()), 6);
    }

    #[test]
    fn test_fit_width_wide_characters() {
        // Each CJK character is two columns wide.
        let out = fit_width("株式会社", 5);
        assert_eq!(UnicodeWidthStr::width(out.as_str()), 5);
        assert!(out.contains('…'));
    }

    #[test]
    fn test_fit_width_zero() {
        assert_eq!(fit_width("anything", 0), "");
    }
}
