//! Plain-text rendition of the dashboard for `--output text`.
//!
//! Shows the same sections as the TUI: header, stats, insights, per-bucket
//! totals and distribution. Colours and charts are dropped; the trend is
//! drawn as a column of text bars.

use std::fmt::Write as _;

use dividend_core::formatting::{format_currency, format_percent};
use dividend_core::models::ChartKind;
use dividend_data::analysis::DashboardSnapshot;

use crate::components::header::ALL_SYMBOLS_LABEL;
use crate::components::share_bar::fit_width;

/// Columns used by the longest trend bar.
const TREND_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 14;

/// Render `snapshot` as a multi-line report.
///
/// `chart` only changes the trend glyph (`█` for bars, `•` for line).
pub fn render_report(
    snapshot: &DashboardSnapshot,
    source: Option<&str>,
    currency: &str,
    chart: ChartKind,
) -> String {
    let mut out = String::new();
    let options = &snapshot.options;

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "DIVIDENDS VISUALIZER");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "[ {} | {} | {} | {} ]",
        source.unwrap_or("no file loaded"),
        options.granularity,
        options.symbol.as_deref().unwrap_or(ALL_SYMBOLS_LABEL),
        chart
    );
    out.push('\n');

    if snapshot.is_empty() {
        let _ = writeln!(out, "No dividend data loaded");
        return out;
    }

    // ── Stats ─────────────────────────────────────────────────────────────────
    let stats = &snapshot.stats;
    for (title, amount) in [
        ("Total Dividends", stats.total),
        ("Avg per Quarter", stats.avg_quarterly),
        ("Avg per Month", stats.avg_monthly),
        ("Avg per Day", stats.avg_daily),
    ] {
        let _ = writeln!(out, "{:<20}{}", title, format_currency(amount, currency));
    }
    let _ = writeln!(
        out,
        "{} payments · {} symbols",
        stats.record_count, stats.symbol_count
    );
    if snapshot.metadata.undated_records > 0 {
        let _ = writeln!(
            out,
            "{} payments have an unreadable date",
            snapshot.metadata.undated_records
        );
    }
    out.push('\n');

    // ── Insights ──────────────────────────────────────────────────────────────
    if let Some(insights) = &snapshot.insights {
        let _ = writeln!(out, "Insights");
        let c = &insights.contribution;
        let lead = if c.selected { "" } else { "Top stock " };
        let _ = writeln!(
            out,
            "  {}{} contributes {} of total dividends",
            lead,
            c.symbol,
            format_percent(c.percentage)
        );
        if let Some(m) = &insights.highest_month {
            let _ = writeln!(
                out,
                "  Highest payout month: {} ({})",
                m.label,
                format_currency(m.total, currency)
            );
        }
        if let Some(m) = &insights.lowest_month {
            let _ = writeln!(
                out,
                "  Lowest payout month:  {} ({})",
                m.label,
                format_currency(m.total, currency)
            );
        }
        if !c.selected {
            let _ = writeln!(
                out,
                "  Top 3 stocks account for {} of income",
                format_percent(insights.top3_percentage)
            );
        }
        out.push('\n');
    }

    // ── Trend ─────────────────────────────────────────────────────────────────
    let _ = writeln!(out, "{} Dividends", options.granularity.title());
    let glyph = match chart {
        ChartKind::Bar => '█',
        ChartKind::Line => '•',
    };
    let max = snapshot
        .bucket_totals
        .iter()
        .map(|b| b.total)
        .fold(0.0_f64, f64::max);
    for bucket in &snapshot.bucket_totals {
        let len = if max > 0.0 {
            ((bucket.total.max(0.0) / max) * TREND_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {} {:<width$} {}",
            fit_width(&bucket.key.to_string(), LABEL_WIDTH),
            std::iter::repeat_n(glyph, len).collect::<String>(),
            format_currency(bucket.total, currency),
            width = TREND_WIDTH
        );
    }
    out.push('\n');

    // ── Distribution ──────────────────────────────────────────────────────────
    let _ = writeln!(out, "Distribution");
    for slice in &snapshot.distribution {
        let _ = writeln!(
            out,
            "  {} {:>7}  {}",
            fit_width(&slice.label, LABEL_WIDTH),
            format_percent(slice.percentage),
            format_currency(slice.amount, currency)
        );
    }

    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
