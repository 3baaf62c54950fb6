//! Dashboard pipeline.
//!
//! Turns a record list and the current view selections into a
//! [`DashboardSnapshot`] holding every figure the presentation layer shows.

use std::time::Instant;

use chrono::Utc;
use dividend_core::error::Result;
use dividend_core::models::{Granularity, TransactionRecord};
use dividend_core::settings::DEFAULT_TOP_N;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    BucketRow, BucketTotal, DistributionSlice, DividendAggregator, DividendStats, SymbolTotal,
};
use crate::insights::{InsightExtractor, Insights};

// ── Public types ──────────────────────────────────────────────────────────────

/// View selections that shape a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewOptions {
    pub granularity: Granularity,
    /// Restrict every view except insights to this symbol.
    pub symbol: Option<String>,
    /// Symbols shown individually in the distribution.
    pub top_n: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Monthly,
            symbol: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Metadata produced alongside the snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMetadata {
    /// RFC 3339 timestamp when this snapshot was generated.
    pub generated_at: String,
    /// Records in the unfiltered list.
    pub records_total: usize,
    /// Records left after the symbol filter.
    pub records_filtered: usize,
    /// Filtered records whose date could not be parsed.
    pub undated_records: usize,
    /// Wall-clock seconds spent computing the snapshot.
    pub compute_time_seconds: f64,
}

/// Everything the dashboard renders, computed from one record list.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub options: ViewOptions,
    pub stats: DividendStats,
    /// Per-bucket, per-symbol amounts, rounded for display.
    pub buckets: Vec<BucketRow>,
    /// Per-bucket totals across symbols, full precision.
    pub bucket_totals: Vec<BucketTotal>,
    /// Filtered symbols ordered by total, largest first.
    pub symbol_totals: Vec<SymbolTotal>,
    pub distribution: Vec<DistributionSlice>,
    /// Computed from the unfiltered list.
    pub insights: Option<Insights>,
    /// Every symbol in the unfiltered list, alphabetical.
    pub symbols: Vec<String>,
    pub metadata: SnapshotMetadata,
}

impl DashboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.metadata.records_filtered == 0
    }

    /// Symbols in stacking order for the bar chart.
    pub fn series(&self) -> impl Iterator<Item = &str> {
        self.symbol_totals.iter().map(|t| t.symbol.as_str())
    }

    /// Pretty-printed JSON for `--output json`.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Compute every dashboard view for `records` under `options`.
///
/// 1. Apply the symbol filter.
/// 2. Stats, aggregation, symbol totals and distribution from the filtered list.
/// 3. Insights and the symbol list from the unfiltered list.
pub fn analyze_dividends(records: &[TransactionRecord], options: &ViewOptions) -> DashboardSnapshot {
    let start = Instant::now();

    let filtered = DividendAggregator::filter_by_symbol(records, options.symbol.as_deref());

    let stats = DividendAggregator::stats(&filtered);
    let aggregation = DividendAggregator::aggregate(&filtered, options.granularity);
    let symbol_totals = DividendAggregator::symbol_totals(&filtered);
    let distribution = DividendAggregator::distribution(&filtered, options.top_n);

    let insights = InsightExtractor::extract(records, options.symbol.as_deref());
    let symbols = DividendAggregator::unique_symbols(records);

    let undated_records = filtered.iter().filter(|r| !r.date.is_valid()).count();
    let compute_time = start.elapsed().as_secs_f64();

    debug!(
        "Snapshot: {} of {} records, {} {} buckets, {:.3}ms",
        filtered.len(),
        records.len(),
        aggregation.len(),
        options.granularity,
        compute_time * 1000.0
    );

    DashboardSnapshot {
        options: options.clone(),
        stats,
        buckets: aggregation.rows(),
        bucket_totals: aggregation.bucket_totals(),
        symbol_totals,
        distribution,
        insights,
        symbols,
        metadata: SnapshotMetadata {
            generated_at: Utc::now().to_rfc3339(),
            records_total: records.len(),
            records_filtered: filtered.len(),
            undated_records,
            compute_time_seconds: compute_time,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
