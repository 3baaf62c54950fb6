//! Main dashboard screen.
//!
//! Lays out the header, stat cards, insights, trend chart, distribution and
//! bucket table from one [`DashboardSnapshot`]. Nothing here computes
//! business figures; it only formats what the snapshot carries.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use dividend_core::formatting::{format_compact, format_currency, format_percent};
use dividend_core::models::ChartKind;
use dividend_data::analysis::DashboardSnapshot;
use dividend_data::insights::Insights;

use crate::components::header::Header;
use crate::components::share_bar::ShareBar;
use crate::components::stat_cards::StatCards;
use crate::table_view::{build_table_rows, render_table_view};
use crate::themes::Theme;

/// Key help shown in the footer.
pub const KEY_HELP: &str =
    "1/2/3 granularity · g cycle · c chart · ←/→ symbol · a all · r reload · q quit";

/// All data required to render the dashboard.
pub struct DashboardViewData<'a> {
    pub snapshot: &'a DashboardSnapshot,
    /// File name of the loaded statement.
    pub source: Option<&'a str>,
    pub chart: ChartKind,
    pub currency: &'a str,
    /// Transient status line (load errors, reload notices).
    pub status: Option<&'a str>,
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the full dashboard into `area`.
pub fn render_dashboard(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(10),
            Constraint::Length(1),
        ])
        .split(area);

    let snapshot = data.snapshot;
    let header = Header::new(
        data.source,
        snapshot.options.granularity,
        snapshot.options.symbol.as_deref(),
        data.chart,
        theme,
    );
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), rows[0]);

    // ── Stats | insights ──────────────────────────────────────────────────────
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let cards = StatCards::new(&snapshot.stats, data.currency, theme);
    frame.render_widget(
        Paragraph::new(Text::from(cards.to_lines())).block(bordered(" Overview ", theme)),
        top[0],
    );
    frame.render_widget(
        Paragraph::new(Text::from(build_insight_lines(
            snapshot.insights.as_ref(),
            data.currency,
            theme,
        )))
        .block(bordered(" Insights ", theme)),
        top[1],
    );

    // ── Trend ─────────────────────────────────────────────────────────────────
    let trend_title = format!(" {} Dividends ", snapshot.options.granularity.title());
    match data.chart {
        ChartKind::Line => render_line_chart(frame, rows[2], &trend_title, data, theme),
        ChartKind::Bar => render_bar_chart(frame, rows[2], &trend_title, data, theme),
    }

    // ── Distribution | table ──────────────────────────────────────────────────
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);

    frame.render_widget(
        Paragraph::new(Text::from(build_distribution_lines(
            snapshot,
            data.currency,
            theme,
        )))
        .block(bordered(" Distribution ", theme)),
        bottom[0],
    );

    let (table_rows, totals) = build_table_rows(&snapshot.buckets);
    render_table_view(
        frame,
        bottom[1],
        snapshot.options.granularity.title(),
        &table_rows,
        &totals,
        data.currency,
        theme,
    );

    // ── Footer ────────────────────────────────────────────────────────────────
    let footer = match data.status {
        Some(status) => Line::from(Span::styled(status.to_string(), theme.error)),
        None => Line::from(Span::styled(KEY_HELP, theme.dim)),
    };
    frame.render_widget(Paragraph::new(footer), rows[4]);
}

// ── Line builders (extracted for testability) ─────────────────────────────────

/// Lines of the insights panel.
///
/// The top-3 concentration line only appears for the "All Stocks" view.
pub fn build_insight_lines<'a>(
    insights: Option<&Insights>,
    currency: &str,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let Some(insights) = insights else {
        return vec![Line::from(Span::styled(
            "Not enough data for insights",
            theme.dim,
        ))];
    };

    let mut lines = Vec::with_capacity(4);

    let c = &insights.contribution;
    let lead = if c.selected {
        format!("{} contributes ", c.symbol)
    } else {
        format!("Top stock {} contributes ", c.symbol)
    };
    lines.push(Line::from(vec![
        Span::styled(lead, theme.text),
        Span::styled(format_percent(c.percentage), theme.share_style(c.percentage)),
        Span::styled(" of total dividends", theme.text),
    ]));

    for (title, fact) in [
        ("Highest payout month: ", insights.highest_month.as_ref()),
        ("Lowest payout month:  ", insights.lowest_month.as_ref()),
    ] {
        let value = match fact {
            Some(m) => format!("{} ({})", m.label, format_currency(m.total, currency)),
            None => "n/a".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(title, theme.label),
            Span::styled(value, theme.bold),
        ]));
    }

    if !c.selected {
        lines.push(Line::from(vec![
            Span::styled("Top 3 stocks account for ", theme.text),
            Span::styled(
                format_percent(insights.top3_percentage),
                theme.share_style(insights.top3_percentage),
            ),
            Span::styled(" of income", theme.text),
        ]));
    }

    lines
}

/// One share bar per distribution slice.
pub fn build_distribution_lines<'a>(
    snapshot: &'a DashboardSnapshot,
    currency: &'a str,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    if snapshot.distribution.is_empty() {
        return vec![Line::from(Span::styled("No dividends to distribute", theme.dim))];
    }

    snapshot
        .distribution
        .iter()
        .map(|slice| {
            let color = if slice.is_others {
                theme.dim.fg.unwrap_or(theme.palette[0])
            } else {
                theme.series_color(&slice.label)
            };
            ShareBar::new(
                &slice.label,
                slice.amount,
                slice.percentage,
                color,
                currency,
                theme,
            )
            .to_line()
        })
        .collect()
}

// ── Charts ────────────────────────────────────────────────────────────────────

fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &DashboardViewData,
    theme: &Theme,
) {
    let totals = &data.snapshot.bucket_totals;
    if totals.is_empty() {
        render_empty_chart(frame, area, title, theme);
        return;
    }

    let points: Vec<(f64, f64)> = totals
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.total))
        .collect();
    let max = totals.iter().map(|b| b.total).fold(0.0_f64, f64::max);
    let y_top = if max > 0.0 { max * 1.1 } else { 1.0 };

    let x_labels: Vec<String> = match (totals.first(), totals.last()) {
        (Some(first), Some(last)) if totals.len() > 1 => {
            vec![first.key.to_string(), last.key.to_string()]
        }
        (Some(only), _) => vec![only.key.to_string()],
        _ => Vec::new(),
    };
    let y_labels = vec![
        format_compact(0.0, data.currency),
        format_compact(max / 2.0, data.currency),
        format_compact(max, data.currency),
    ];

    let dataset = Dataset::default()
        .name("Total")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_total)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(bordered(title, theme))
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, (points.len().saturating_sub(1)).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_top])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &DashboardViewData,
    theme: &Theme,
) {
    let snapshot = data.snapshot;
    if snapshot.buckets.is_empty() {
        render_empty_chart(frame, area, title, theme);
        return;
    }

    let series: Vec<&str> = snapshot.series().collect();
    let mut chart = BarChart::default()
        .block(bordered(title, theme))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);

    for bucket in &snapshot.buckets {
        let bars: Vec<Bar> = series
            .iter()
            .filter_map(|symbol| {
                let amount = *bucket.amounts.get(*symbol)?;
                Some(
                    Bar::default()
                        .value(amount.max(0.0).round() as u64)
                        .text_value(format_compact(amount, data.currency))
                        .style(theme.series_style(symbol)),
                )
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(bucket.key.to_string()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn render_empty_chart(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("No data for this view", theme.dim)))
            .block(bordered(title, theme)),
        area,
    );
}

fn bordered<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_core::models::{Granularity, TransactionRecord};
    use dividend_data::analysis::{analyze_dividends, ViewOptions};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn snapshot(options: ViewOptions) -> DashboardSnapshot {
        let records = vec![
            TransactionRecord::new("INFY", "2023-06-02", 175.0),
            TransactionRecord::new("TCS", "2023-07-20", 90.0),
            TransactionRecord::new("ITC", "2023-08-15", 62.5),
            TransactionRecord::new("INFY", "2024-01-12", 180.0),
        ];
        analyze_dividends(&records, &options)
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn draw(data: &DashboardViewData) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, data, &theme);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    // ── insights ──────────────────────────────────────────────────────────────

    #[test]
    fn test_insight_lines_top_stock() {
        let theme = Theme::dark();
        let snap = snapshot(ViewOptions::default());
        let lines = build_insight_lines(snap.insights.as_ref(), "₹", &theme);

        assert_eq!(lines.len(), 4);
        let first = line_text(&lines[0]);
        assert!(first.starts_with("Top stock INFY"), "got: {first}");
        assert!(line_text(&lines[1]).contains("Jan 2024 (₹180.00)"));
        assert!(line_text(&lines[2]).contains("Aug 2023 (₹62.50)"));
        assert!(line_text(&lines[3]).starts_with("Top 3 stocks account for"));
    }

    #[test]
    fn test_insight_lines_selected_symbol() {
        let theme = Theme::dark();
        let snap = snapshot(ViewOptions {
            symbol: Some("TCS".to_string()),
            ..ViewOptions::default()
        });
        let lines = build_insight_lines(snap.insights.as_ref(), "₹", &theme);
        assert!(line_text(&lines[0]).starts_with("TCS contributes"));
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !line_text(l).contains("Top 3")));
    }

    #[test]
    fn test_insight_lines_without_data() {
        let theme = Theme::dark();
        let lines = build_insight_lines(None, "₹", &theme);
        assert_eq!(lines.len(), 1);
        assert!(line_text(&lines[0]).contains("Not enough data"));
    }

    // ── distribution ──────────────────────────────────────────────────────────

    #[test]
    fn test_distribution_lines_one_per_slice() {
        let theme = Theme::dark();
        let snap = snapshot(ViewOptions {
            top_n: 2,
            ..ViewOptions::default()
        });
        let lines = build_distribution_lines(&snap, "₹", &theme);
        assert_eq!(lines.len(), 3);
        assert!(line_text(&lines[2]).starts_with("Others"));
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_dashboard_line_chart() {
        let snap = snapshot(ViewOptions::default());
        let text = draw(&DashboardViewData {
            snapshot: &snap,
            source: Some("statement.xlsx"),
            chart: ChartKind::Line,
            currency: "₹",
            status: None,
        });
        assert!(text.contains("DIVIDENDS VISUALIZER"));
        assert!(text.contains("Monthly Dividends"));
        assert!(text.contains("Total Dividends"));
    }

    #[test]
    fn test_render_dashboard_bar_chart_does_not_panic() {
        let snap = snapshot(ViewOptions {
            granularity: Granularity::Yearly,
            ..ViewOptions::default()
        });
        let text = draw(&DashboardViewData {
            snapshot: &snap,
            source: None,
            chart: ChartKind::Bar,
            currency: "$",
            status: Some("Failed to decode workbook"),
        });
        assert!(text.contains("Yearly Dividends"));
        assert!(text.contains("Failed to decode workbook"));
    }

    #[test]
    fn test_render_dashboard_empty_snapshot() {
        let snap = analyze_dividends(&[], &ViewOptions::default());
        for chart in [ChartKind::Line, ChartKind::Bar] {
            let text = draw(&DashboardViewData {
                snapshot: &snap,
                source: None,
                chart,
                currency: "₹",
                status: None,
            });
            assert!(text.contains("No data for this view"));
        }
    }
}
