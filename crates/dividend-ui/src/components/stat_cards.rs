use crate::themes::Theme;
use dividend_core::formatting::{format_currency, format_number};
use dividend_core::time_utils::display_date;
use dividend_data::aggregator::DividendStats;
use ratatui::text::{Line, Span};

/// Width of the label column in stat rows.
const LABEL_WIDTH: usize = 20;

/// Headline figures: total, three per-period averages and a coverage line.
pub struct StatCards<'a> {
    pub stats: &'a DividendStats,
    pub currency: &'a str,
    pub theme: &'a Theme,
}

impl<'a> StatCards<'a> {
    pub fn new(stats: &'a DividendStats, currency: &'a str, theme: &'a Theme) -> Self {
        Self {
            stats,
            currency,
            theme,
        }
    }

    /// The four cards in display order as `(title, formatted amount)`.
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Total Dividends", format_currency(self.stats.total, self.currency)),
            (
                "Avg per Quarter",
                format_currency(self.stats.avg_quarterly, self.currency),
            ),
            (
                "Avg per Month",
                format_currency(self.stats.avg_monthly, self.currency),
            ),
            ("Avg per Day", format_currency(self.stats.avg_daily, self.currency)),
        ]
    }

    /// Five lines: one per card, then the coverage line.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut lines: Vec<Line<'a>> = self
            .cards()
            .into_iter()
            .map(|(title, amount)| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}", title, width = LABEL_WIDTH), self.theme.label),
                    Span::styled(amount, self.theme.value),
                ])
            })
            .collect();

        lines.push(self.coverage_line());
        lines
    }

    /// `12 payments · 4 symbols · 05 Jan 2023 → 30 Nov 2024`
    fn coverage_line(&self) -> Line<'a> {
        let span = match (self.stats.first_date, self.stats.last_date) {
            (Some(first), Some(last)) => {
                format!("{} → {}", display_date(first), display_date(last))
            }
            _ => "no dated payments".to_string(),
        };

        Line::from(vec![
            Span::styled(
                format!(
                    "{} payments · {} symbols · ",
                    format_number(self.stats.record_count as f64, 0),
                    self.stats.symbol_count
                ),
                self.theme.dim,
            ),
            Span::styled(span, self.theme.dim),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn stats() -> DividendStats {
        DividendStats {
            total: 1460.0,
            avg_quarterly: 365.0,
            avg_monthly: 1460.0 / 12.0,
            avg_daily: 4.0,
            record_count: 3,
            symbol_count: 2,
            first_date: NaiveDate::from_ymd_opt(2023, 7, 15),
            last_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn test_cards_formatting() {
        let theme = Theme::dark();
        let s = stats();
        let cards = StatCards::new(&s, "₹", &theme).cards();
        assert_eq!(cards[0], ("Total Dividends", "₹1,460.00".to_string()));
        assert_eq!(cards[1].1, "₹365.00");
        assert_eq!(cards[2].1, "₹121.67");
        assert_eq!(cards[3].1, "₹4.00");
    }

    #[test]
    fn test_to_lines_layout() {
        let theme = Theme::dark();
        let s = stats();
        let lines = StatCards::new(&s, "$", &theme).to_lines();
        assert_eq!(lines.len(), 5);
        assert!(line_text(&lines[0]).starts_with("Total Dividends"));
        assert!(line_text(&lines[0]).ends_with("$1,460.00"));
        assert_eq!(
            line_text(&lines[4]),
            "3 payments · 2 symbols · 15 Jul 2023 → 01 Mar 2024"
        );
    }

    #[test]
    fn test_coverage_without_dates() {
        let theme = Theme::dark();
        let s = DividendStats::default();
        let lines = StatCards::new(&s, "₹", &theme).to_lines();
        assert!(line_text(&lines[4]).contains("no dated payments"));
        assert!(line_text(&lines[0]).ends_with("₹0.00"));
    }
}
