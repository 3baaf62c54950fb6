//! Summary facts derived from the whole statement.
//!
//! Insights always look at the unfiltered record list: a selected symbol's
//! contribution is measured against everything received.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use dividend_core::formatting::share_percent;
use dividend_core::models::TransactionRecord;
use dividend_core::time_utils::month_label;
use serde::Serialize;

use crate::aggregator::DividendAggregator;

/// Number of symbols in the concentration figure.
pub const CONCENTRATION_TOP: usize = 3;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Share of the grand total attributable to one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub symbol: String,
    pub amount: f64,
    pub percentage: f64,
    /// `true` when this is the user's selection rather than the top symbol.
    pub selected: bool,
}

/// Total paid out in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFact {
    /// e.g. `"Jan 2024"`.
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

/// Facts shown in the insights panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub contribution: Contribution,
    /// `None` when no record carries a valid date.
    pub highest_month: Option<MonthFact>,
    pub lowest_month: Option<MonthFact>,
    /// Combined share of the three largest symbols, in percent.
    pub top3_percentage: f64,
    pub grand_total: f64,
}

// ── InsightExtractor ──────────────────────────────────────────────────────────

/// Stateless extractor for [`Insights`].
pub struct InsightExtractor;

impl InsightExtractor {
    /// Derive insights, or `None` when the grand total is zero.
    pub fn extract(records: &[TransactionRecord], selected: Option<&str>) -> Option<Insights> {
        let grand_total = DividendAggregator::grand_total(records);
        if grand_total == 0.0 {
            return None;
        }

        let symbol_totals = DividendAggregator::symbol_totals(records);

        let contribution = match selected {
            Some(symbol) => {
                let amount = symbol_totals
                    .iter()
                    .find(|t| t.symbol == symbol)
                    .map(|t| t.total)
                    .unwrap_or(0.0);
                Contribution {
                    symbol: symbol.to_string(),
                    amount,
                    percentage: share_percent(amount, grand_total),
                    selected: true,
                }
            }
            None => {
                let top = symbol_totals.first()?;
                Contribution {
                    symbol: top.symbol.clone(),
                    amount: top.total,
                    percentage: share_percent(top.total, grand_total),
                    selected: false,
                }
            }
        };

        let top3: f64 = symbol_totals
            .iter()
            .take(CONCENTRATION_TOP)
            .map(|t| t.total)
            .sum();

        let months = month_totals(records);

        let mut by_highest = months.clone();
        by_highest.sort_by(|a, b| b.total.total_cmp(&a.total));
        let mut by_lowest = months;
        by_lowest.sort_by(|a, b| a.total.total_cmp(&b.total));

        Some(Insights {
            contribution,
            highest_month: by_highest.into_iter().next(),
            lowest_month: by_lowest.into_iter().next(),
            top3_percentage: share_percent(top3, grand_total),
            grand_total,
        })
    }
}

/// Calendar-month totals in first-encounter order. Undated records are
/// skipped.
fn month_totals(records: &[TransactionRecord]) -> Vec<MonthFact> {
    let mut index: HashMap<(i32, u32), usize> = HashMap::new();
    let mut months: Vec<MonthFact> = Vec::new();

    for record in records {
        let Some(date) = record.date.as_date() else {
            continue;
        };
        let key = (date.year(), date.month());
        let slot = *index.entry(key).or_insert_with(|| {
            months.push(month_fact(date));
            months.len() - 1
        });
        months[slot].total += record.net_dividend_amount;
    }

    months
}

fn month_fact(date: NaiveDate) -> MonthFact {
    MonthFact {
        label: month_label(date),
        year: date.year(),
        month: date.month(),
        total: 0.0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_core::formatting::format_percent;

    fn rec(symbol: &str, date: &str, amount: f64) -> TransactionRecord {
        TransactionRecord::new(symbol, date, amount)
    }

    #[test]
    fn test_top_symbol_contribution() {
        let records = vec![rec("X", "2024-01-15", 100.0), rec("Y", "2024-01-20", 50.0)];
        let insights = InsightExtractor::extract(&records, None).unwrap();

        assert_eq!(insights.contribution.symbol, "X");
        assert!(!insights.contribution.selected);
        assert_eq!(format_percent(insights.contribution.percentage), "66.67%");
        assert_eq!(insights.grand_total, 150.0);
    }

    #[test]
    fn test_selected_symbol_against_unfiltered_total() {
        let records = vec![rec("X", "2024-01-15", 100.0), rec("Y", "2024-01-20", 50.0)];
        let insights = InsightExtractor::extract(&records, Some("Y")).unwrap();

        assert_eq!(insights.contribution.symbol, "Y");
        assert!(insights.contribution.selected);
        assert_eq!(format_percent(insights.contribution.percentage), "33.33%");
    }

    #[test]
    fn test_selected_symbol_absent_contributes_zero() {
        let records = vec![rec("X", "2024-01-15", 100.0)];
        let insights = InsightExtractor::extract(&records, Some("ZZZ")).unwrap();
        assert_eq!(insights.contribution.amount, 0.0);
        assert_eq!(insights.contribution.percentage, 0.0);
    }

    #[test]
    fn test_highest_and_lowest_month() {
        let records = vec![
            rec("A", "2024-01-05", 10.0),
            rec("B", "2024-01-25", 15.0),
            rec("A", "2024-03-10", 40.0),
            rec("C", "2023-12-31", 5.0),
        ];
        let insights = InsightExtractor::extract(&records, None).unwrap();

        let high = insights.highest_month.unwrap();
        assert_eq!(high.label, "Mar 2024");
        assert_eq!(high.total, 40.0);

        let low = insights.lowest_month.unwrap();
        assert_eq!(low.label, "Dec 2023");
        assert_eq!(low.total, 5.0);
    }

    #[test]
    fn test_month_ties_go_to_first_encountered() {
        let records = vec![
            rec("A", "2024-05-01", 20.0),
            rec("A", "2024-02-01", 20.0),
        ];
        let insights = InsightExtractor::extract(&records, None).unwrap();
        assert_eq!(insights.highest_month.unwrap().label, "May 2024");
        assert_eq!(insights.lowest_month.unwrap().label, "May 2024");
    }

    #[test]
    fn test_undated_records_excluded_from_months_but_counted() {
        let records = vec![rec("A", "2024-01-15", 10.0), rec("B", "bogus", 90.0)];
        let insights = InsightExtractor::extract(&records, None).unwrap();

        assert_eq!(insights.grand_total, 100.0);
        assert_eq!(insights.contribution.symbol, "B");
        assert_eq!(insights.highest_month.unwrap().total, 10.0);
    }

    #[test]
    fn test_only_undated_records_have_no_month_facts() {
        let insights = InsightExtractor::extract(&[rec("A", "", 10.0)], None).unwrap();
        assert!(insights.highest_month.is_none());
        assert!(insights.lowest_month.is_none());
    }

    #[test]
    fn test_top3_concentration() {
        let records = vec![
            rec("A", "2024-01-01", 40.0),
            rec("B", "2024-01-01", 30.0),
            rec("C", "2024-01-01", 20.0),
            rec("D", "2024-01-01", 10.0),
        ];
        let insights = InsightExtractor::extract(&records, None).unwrap();
        assert!((insights.top3_percentage - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_top3_with_fewer_symbols_is_hundred() {
        let records = vec![rec("A", "2024-01-01", 1.0), rec("B", "2024-02-01", 3.0)];
        let insights = InsightExtractor::extract(&records, None).unwrap();
        assert!((insights.top3_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_or_zero_total_yields_none() {
        assert!(InsightExtractor::extract(&[], None).is_none());
        assert!(InsightExtractor::extract(&[rec("A", "2024-01-01", 0.0)], Some("A")).is_none());
    }
}
