//! Bucket table for the dividend dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per time
//! bucket plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dividend_core::formatting::{format_currency, format_percent, share_percent};
use dividend_data::aggregator::BucketRow;

use crate::themes::Theme;

/// Data for a single row in the bucket table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    /// Bucket label, e.g. `"2024-02"`, `"2024-Q1"`, `"2024"`.
    pub period: String,
    /// Largest payer in the bucket.
    pub top_symbol: String,
    pub symbol_count: usize,
    pub total: f64,
    /// Share of the table total, in percent.
    pub share: f64,
}

/// Totals across every row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTotals {
    pub total: f64,
    pub periods: usize,
}

/// Convert bucket rows into table rows and totals.
pub fn build_table_rows(buckets: &[BucketRow]) -> (Vec<TableRowData>, TableTotals) {
    let total: f64 = buckets.iter().map(|b| b.total).sum();

    let rows = buckets
        .iter()
        .map(|bucket| {
            // Ties resolve to the alphabetically first symbol.
            let top_symbol = bucket
                .amounts
                .iter()
                .fold(None::<(&String, f64)>, |best, (symbol, amount)| match best {
                    Some((_, best_amount)) if best_amount >= *amount => best,
                    _ => Some((symbol, *amount)),
                })
                .map(|(symbol, _)| symbol.clone())
                .unwrap_or_default();

            TableRowData {
                period: bucket.key.to_string(),
                top_symbol,
                symbol_count: bucket.amounts.len(),
                total: bucket.total,
                share: share_percent(bucket.total, total),
            }
        })
        .collect();

    (
        rows,
        TableTotals {
            total,
            periods: buckets.len(),
        },
    )
}

/// Render the bucket table into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[TableRowData],
    totals: &TableTotals,
    currency: &str,
    theme: &Theme,
) {
    let header_cells = ["Period", "Top Symbol", "Symbols", "Total", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.period.clone()),
                Cell::from(row.top_symbol.clone()).style(theme.series_style(&row.top_symbol)),
                Cell::from(row.symbol_count.to_string()),
                Cell::from(format_currency(row.total, currency)),
                Cell::from(format_percent(row.share)),
            ])
            .style(style)
        })
        .collect();

    let total_row = Row::new(vec![
        Cell::from("TOTAL"),
        Cell::from(format!("{} periods", totals.periods)),
        Cell::from(""),
        Cell::from(format_currency(totals.total, currency)),
        Cell::from(if totals.periods > 0 { "100.00%" } else { "" }),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Length(9),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when the statement holds no dividend rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, message: Option<&str>, theme: &Theme) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("No dividend data loaded", theme.warning)),
        Line::from(""),
    ];
    if let Some(message) = message {
        text.push(Line::from(Span::styled(message.to_string(), theme.error)));
        text.push(Line::from(""));
    }
    text.push(Line::from(Span::styled(
        "Press 'r' to reload the file, 'q' or Ctrl+C to exit",
        theme.dim,
    )));

    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Dividends Visualizer "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_core::models::{Granularity, TransactionRecord};
    use dividend_data::aggregator::DividendAggregator;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buckets() -> Vec<BucketRow> {
        let records = vec![
            TransactionRecord::new("INFY", "2024-01-10", 100.0),
            TransactionRecord::new("TCS", "2024-01-20", 60.0),
            TransactionRecord::new("TCS", "2024-05-02", 40.0),
        ];
        DividendAggregator::aggregate(&records, Granularity::Quarterly).rows()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    // ── build_table_rows ──────────────────────────────────────────────────────

    #[test]
    fn test_build_table_rows() {
        let (rows, totals) = build_table_rows(&buckets());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period, "2024-Q1");
        assert_eq!(rows[0].top_symbol, "INFY");
        assert_eq!(rows[0].symbol_count, 2);
        assert_eq!(rows[0].total, 160.0);
        assert!((rows[0].share - 80.0).abs() < 1e-9);
        assert_eq!(rows[1].period, "2024-Q2");
        assert_eq!(rows[1].top_symbol, "TCS");

        assert_eq!(totals.total, 200.0);
        assert_eq!(totals.periods, 2);
    }

    #[test]
    fn test_build_table_rows_empty() {
        let (rows, totals) = build_table_rows(&[]);
        assert!(rows.is_empty());
        assert_eq!(totals.total, 0.0);
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_table_view_contains_rows() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let (rows, totals) = build_table_rows(&buckets());

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Quarterly", &rows, &totals, "₹", &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("2024-Q1"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("80.00%"));
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, Some("Unsupported file type"), &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No dividend data loaded"));
    }
}
