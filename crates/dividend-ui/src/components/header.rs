use crate::themes::Theme;
use dividend_core::models::{ChartKind, Granularity};
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const ORNAMENT: &str = "✦ ✧";

/// Label shown when no symbol filter is active.
pub const ALL_SYMBOLS_LABEL: &str = "All Stocks";

/// Dashboard header rendering four lines:
///
/// 1. Application title with ornaments.
/// 2. A 60-column `=` separator.
/// 3. `[ file | granularity | filter | chart ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded statement, if any.
    pub source: Option<&'a str>,
    pub granularity: Granularity,
    /// Selected symbol; `None` shows [`ALL_SYMBOLS_LABEL`].
    pub symbol: Option<&'a str>,
    pub chart: ChartKind,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        source: Option<&'a str>,
        granularity: Granularity,
        symbol: Option<&'a str>,
        chart: ChartKind,
        theme: &'a Theme,
    ) -> Self {
        Self {
            source,
            granularity,
            symbol,
            chart,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ORNAMENT, self.theme.header_accent),
                Span::styled(" DIVIDENDS VISUALIZER ", self.theme.header),
                Span::styled(ORNAMENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    self.source.unwrap_or("no file loaded").to_string(),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.granularity.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    self.symbol.unwrap_or(ALL_SYMBOLS_LABEL).to_string(),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.chart.to_string(), self.theme.value),
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

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let header = Header::new(None, Granularity::Monthly, None, ChartKind::Line, &theme);
        assert_eq!(header.to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let header = Header::new(None, Granularity::Monthly, None, ChartKind::Line, &theme);
        let title = line_text(&header.to_lines()[0]);
        assert!(title.contains("DIVIDENDS VISUALIZER"), "got: {title}");
        assert!(title.starts_with(ORNAMENT));
    }

    #[test]
    fn test_header_info_line_with_filter() {
        let theme = Theme::dark();
        let header = Header::new(
            Some("statement.xlsx"),
            Granularity::Quarterly,
            Some("INFY"),
            ChartKind::Bar,
            &theme,
        );
        let info = line_text(&header.to_lines()[2]);
        assert_eq!(info, "[ statement.xlsx | quarterly | INFY | bar ]");
    }

    #[test]
    fn test_header_info_line_defaults() {
        let theme = Theme::dark();
        let header = Header::new(None, Granularity::Yearly, None, ChartKind::Line, &theme);
        let info = line_text(&header.to_lines()[2]);
        assert!(info.contains("no file loaded"), "got: {info}");
        assert!(info.contains(ALL_SYMBOLS_LABEL), "got: {info}");
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let header = Header::new(None, Granularity::Monthly, None, ChartKind::Line, &theme);
        let sep = line_text(&header.to_lines()[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }
}
