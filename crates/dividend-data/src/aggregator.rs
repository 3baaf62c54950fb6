//! Dividend aggregation over time buckets and symbols.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use dividend_core::formatting::{round_amount, share_percent};
use dividend_core::models::{BucketKey, Granularity, TransactionRecord, OTHERS_LABEL};
use dividend_core::settings::DEFAULT_TOP_N;
use serde::Serialize;

// ── AggregationResult ─────────────────────────────────────────────────────────

/// Per-bucket, per-symbol sums of net dividend amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub granularity: Granularity,
    /// Chronologically ordered buckets; the invalid-date bucket sorts last.
    pub buckets: BTreeMap<BucketKey, BTreeMap<String, f64>>,
}

/// One bucket prepared for display, amounts rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRow {
    pub key: BucketKey,
    pub amounts: BTreeMap<String, f64>,
    pub total: f64,
}

/// Sum across symbols for one bucket (line-chart series point).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketTotal {
    pub key: BucketKey,
    pub total: f64,
}

impl AggregationResult {
    fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            buckets: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Amount for one `(bucket, symbol)` pair, 0 when absent.
    pub fn amount(&self, key: &BucketKey, symbol: &str) -> f64 {
        self.buckets
            .get(key)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .copied()
            .unwrap_or(0.0)
    }

    /// Flattened sum over every bucket and symbol, at full precision.
    pub fn total(&self) -> f64 {
        self.buckets
            .values()
            .flat_map(|by_symbol| by_symbol.values())
            .sum()
    }

    /// Per-bucket totals in bucket order, full precision.
    pub fn bucket_totals(&self) -> Vec<BucketTotal> {
        self.buckets
            .iter()
            .map(|(key, by_symbol)| BucketTotal {
                key: *key,
                total: by_symbol.values().sum(),
            })
            .collect()
    }

    /// Display rows with amounts rounded once to two decimals.
    pub fn rows(&self) -> Vec<BucketRow> {
        self.buckets
            .iter()
            .map(|(key, by_symbol)| BucketRow {
                key: *key,
                amounts: by_symbol
                    .iter()
                    .map(|(symbol, amount)| (symbol.clone(), round_amount(*amount)))
                    .collect(),
                total: round_amount(by_symbol.values().sum()),
            })
            .collect()
    }
}

// ── Symbol views ──────────────────────────────────────────────────────────────

/// Total net dividend received from one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolTotal {
    pub symbol: String,
    pub total: f64,
}

/// One slice of the income distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    /// Symbol, or `"Others"` for the overflow slice.
    pub label: String,
    pub amount: f64,
    /// Share of the grand total in percent, unrounded.
    pub percentage: f64,
    pub is_others: bool,
}

// ── DividendStats ─────────────────────────────────────────────────────────────

/// Divisor of the per-quarter average.
pub const QUARTERLY_DIVISOR: f64 = 3.0;

/// Headline figures for a record list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DividendStats {
    pub total: f64,
    pub avg_quarterly: f64,
    pub avg_monthly: f64,
    pub avg_daily: f64,
    pub record_count: usize,
    pub symbol_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

// ── DividendAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups dividend records by bucket and symbol.
pub struct DividendAggregator;

impl DividendAggregator {
    /// Sum `net_dividend_amount` into `buckets[bucket][symbol]`.
    ///
    /// Every record contributes exactly once, so the flattened sum equals the
    /// grand total. Records with an invalid date land in the undated bucket.
    pub fn aggregate(records: &[TransactionRecord], granularity: Granularity) -> AggregationResult {
        let mut result = AggregationResult::new(granularity);

        for record in records {
            let key = BucketKey::for_date(&record.date, granularity);
            *result
                .buckets
                .entry(key)
                .or_default()
                .entry(record.symbol.clone())
                .or_insert(0.0) += record.net_dividend_amount;
        }

        result
    }

    /// Sum of `net_dividend_amount` across all records.
    pub fn grand_total(records: &[TransactionRecord]) -> f64 {
        records.iter().map(|r| r.net_dividend_amount).sum()
    }

    /// Per-symbol totals, largest first.
    ///
    /// Ties keep the order in which symbols were first encountered.
    pub fn symbol_totals(records: &[TransactionRecord]) -> Vec<SymbolTotal> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<SymbolTotal> = Vec::new();

        for record in records {
            let slot = *index.entry(record.symbol.as_str()).or_insert_with(|| {
                totals.push(SymbolTotal {
                    symbol: record.symbol.clone(),
                    total: 0.0,
                });
                totals.len() - 1
            });
            totals[slot].total += record.net_dividend_amount;
        }

        // `sort_by` is stable, which gives the encounter-order tie-break.
        totals.sort_by(|a, b| b.total.total_cmp(&a.total));
        totals
    }

    /// The `n` largest symbols plus an `"Others"` entry holding the rest.
    ///
    /// `"Others"` is only appended when the remainder sums to more than zero.
    pub fn top_n_with_others(records: &[TransactionRecord], n: usize) -> Vec<SymbolTotal> {
        let mut totals = Self::symbol_totals(records);
        if totals.len() <= n {
            return totals;
        }

        let rest = totals.split_off(n);
        let others: f64 = rest.iter().map(|t| t.total).sum();
        if others > 0.0 {
            totals.push(SymbolTotal {
                symbol: OTHERS_LABEL.to_string(),
                total: others,
            });
        }
        totals
    }

    /// Pie data: top-N-with-others slices as shares of the grand total.
    pub fn distribution(records: &[TransactionRecord], n: usize) -> Vec<DistributionSlice> {
        let grand_total = Self::grand_total(records);
        let top_count = Self::symbol_totals(records).len().min(n);

        Self::top_n_with_others(records, n)
            .into_iter()
            .enumerate()
            .map(|(i, t)| DistributionSlice {
                percentage: share_percent(t.total, grand_total),
                amount: t.total,
                is_others: i >= top_count,
                label: t.symbol,
            })
            .collect()
    }

    /// [`Self::distribution`] with the default top-N.
    pub fn default_distribution(records: &[TransactionRecord]) -> Vec<DistributionSlice> {
        Self::distribution(records, DEFAULT_TOP_N)
    }

    /// Headline stats. Averages divide the total by fixed divisors (3, 12,
    /// 365) regardless of the span covered.
    pub fn stats(records: &[TransactionRecord]) -> DividendStats {
        let total = Self::grand_total(records);
        let dates = records.iter().filter_map(|r| r.date.as_date());

        DividendStats {
            total,
            avg_quarterly: total / QUARTERLY_DIVISOR,
            avg_monthly: total / 12.0,
            avg_daily: total / 365.0,
            record_count: records.len(),
            symbol_count: Self::unique_symbols(records).len(),
            first_date: dates.clone().min(),
            last_date: dates.max(),
        }
    }

    /// Distinct symbols in alphabetical order.
    pub fn unique_symbols(records: &[TransactionRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.symbol.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// The full list when `symbol` is `None`, otherwise the matching subset.
    pub fn filter_by_symbol(
        records: &[TransactionRecord],
        symbol: Option<&str>,
    ) -> Vec<TransactionRecord> {
        match symbol {
            None => records.to_vec(),
            Some(s) => records.iter().filter(|r| r.symbol == s).cloned().collect(),
        }
    }

    /// Per-bucket totals across symbols.
    pub fn bucket_totals(records: &[TransactionRecord], granularity: Granularity) -> Vec<BucketTotal> {
        Self::aggregate(records, granularity).bucket_totals()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
