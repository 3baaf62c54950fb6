//! Row parser: positional sheet rows → [`TransactionRecord`]s.
//!
//! Broker exports wrap the real table in report noise: title rows, account
//! details, a repeated header row and a trailing total. The parser maps every
//! row positionally, then keeps only the slice between the `Symbol`/`ISIN`
//! marker row and the `Total Dividend Amount` row.

use std::sync::LazyLock;

use dividend_core::models::{RecordDate, SheetCell, TransactionRecord, UNKNOWN};
use dividend_core::time_utils::{excel_serial_to_date, parse_record_date};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

/// First-column text of the marker row that precedes the data.
pub const START_MARKER_SYMBOL: &str = "Symbol";
/// Second-column text of the same marker row.
pub const START_MARKER_ISIN: &str = "ISIN";
/// First-column text of the summary row that follows the data.
pub const END_MARKER_SYMBOL: &str = "Total Dividend Amount";

/// Fixed column positions of the six record fields.
const COL_SYMBOL: usize = 0;
const COL_ISIN: usize = 1;
const COL_DATE: usize = 2;
const COL_QUANTITY: usize = 3;
const COL_DIVIDEND_PER_SHARE: usize = 4;
const COL_NET_AMOUNT: usize = 5;

/// Anything that is not part of a plain decimal literal: grouping commas,
/// currency symbols, spaces.
static NUMERIC_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("regex is valid"));

// ── Public types ──────────────────────────────────────────────────────────────

/// Half-open range `[start, end)` of mapped rows that hold real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataRegion {
    pub start: usize,
    pub end: usize,
    /// `false` when no start marker was found and the whole sheet is used.
    pub marker_found: bool,
}

impl DataRegion {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Output of [`parse_sheet`].
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    /// Records inside the data region, in sheet order.
    pub records: Vec<TransactionRecord>,
    /// Where the region was found among the mapped rows.
    pub region: DataRegion,
    /// Number of raw rows handed to the parser.
    pub rows_read: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Map one raw row into a record by fixed column position.
///
/// Absent or blank cells fall back to `"Unknown"` for string fields and `0`
/// for numeric fields. Dates are never rejected here.
pub fn map_row(row: &[SheetCell]) -> TransactionRecord {
    TransactionRecord {
        symbol: string_field(row.get(COL_SYMBOL)),
        isin: string_field(row.get(COL_ISIN)),
        date: date_field(row.get(COL_DATE)),
        quantity: number_field(row.get(COL_QUANTITY)),
        dividend_per_share: number_field(row.get(COL_DIVIDEND_PER_SHARE)),
        net_dividend_amount: number_field(row.get(COL_NET_AMOUNT)),
    }
}

/// Locate the data region among already-mapped rows.
///
/// Both markers are searched over the whole sequence. If the end marker sits
/// before the start marker the region is empty.
pub fn locate_data_region(mapped: &[TransactionRecord]) -> DataRegion {
    let start_idx = mapped
        .iter()
        .position(|r| r.symbol == START_MARKER_SYMBOL && r.isin == START_MARKER_ISIN);

    let Some(start_idx) = start_idx else {
        return DataRegion {
            start: 0,
            end: mapped.len(),
            marker_found: false,
        };
    };

    let end_idx = mapped
        .iter()
        .position(|r| r.symbol == END_MARKER_SYMBOL)
        .unwrap_or(mapped.len());

    let start = start_idx + 1;
    DataRegion {
        start,
        end: end_idx.max(start),
        marker_found: true,
    }
}

/// Map every row and keep only the located data region.
pub fn parse_sheet(rows: &[Vec<SheetCell>]) -> ParsedSheet {
    let mut mapped: Vec<TransactionRecord> = rows.iter().map(|row| map_row(row)).collect();
    let region = locate_data_region(&mapped);

    if region.marker_found {
        debug!(
            start = region.start,
            end = region.end,
            "located dividend data region"
        );
    } else {
        warn!(
            rows = mapped.len(),
            "no Symbol/ISIN marker row found; treating the whole sheet as data"
        );
    }

    mapped.truncate(region.end);
    let records = mapped.split_off(region.start);

    ParsedSheet {
        records,
        region,
        rows_read: rows.len(),
    }
}

/// Convenience wrapper returning only the records of [`parse_sheet`].
pub fn parse_rows(rows: &[Vec<SheetCell>]) -> Vec<TransactionRecord> {
    parse_sheet(rows).records
}

// ── Field helpers ─────────────────────────────────────────────────────────────

fn string_field(cell: Option<&SheetCell>) -> String {
    cell.and_then(SheetCell::as_text)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn number_field(cell: Option<&SheetCell>) -> f64 {
    match cell {
        Some(SheetCell::Number(n)) if n.is_finite() => *n,
        Some(SheetCell::Text(s)) => parse_numeric_text(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn date_field(cell: Option<&SheetCell>) -> RecordDate {
    match cell {
        Some(SheetCell::Date(d)) => RecordDate::Valid(*d),
        Some(SheetCell::Number(n)) => match excel_serial_to_date(*n) {
            Some(d) => RecordDate::Valid(d),
            None => RecordDate::Invalid(n.to_string()),
        },
        Some(SheetCell::Text(s)) => parse_record_date(s),
        Some(SheetCell::Bool(b)) => RecordDate::Invalid(b.to_string()),
        Some(SheetCell::Empty) | None => RecordDate::Invalid(UNKNOWN.to_string()),
    }
}

/// Parse numeric text such as `"1,234.50"` or `"₹ 12.00"`.
fn parse_numeric_text(s: &str) -> Option<f64> {
    let cleaned = NUMERIC_NOISE.replace_all(s.trim(), "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
