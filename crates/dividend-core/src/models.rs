use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel used for string fields whose cell was absent.
pub const UNKNOWN: &str = "Unknown";

/// Label of the synthetic entry that collects every symbol outside the top N.
pub const OTHERS_LABEL: &str = "Others";

/// Label of the bucket that collects records whose date could not be parsed.
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

// ── SheetCell ─────────────────────────────────────────────────────────────────

/// A single raw cell as read from the first worksheet.
///
/// Columns are addressed purely by position; the export carries no usable
/// header names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SheetCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell the workbook itself typed as a date.
    Date(NaiveDate),
}

impl SheetCell {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        SheetCell::Text(s.into())
    }

    /// Render the cell as trimmed text, or `None` when it is blank.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SheetCell::Empty => None,
            SheetCell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            SheetCell::Number(n) => Some(n.to_string()),
            SheetCell::Bool(b) => Some(b.to_string()),
            SheetCell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

// ── RecordDate ────────────────────────────────────────────────────────────────

/// Payment date of a record.
///
/// Unparseable dates are kept verbatim instead of being rejected, so that the
/// record still counts towards totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDate {
    Valid(NaiveDate),
    Invalid(String),
}

impl RecordDate {
    /// The parsed date, if any.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Valid(d) => Some(*d),
            RecordDate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RecordDate::Valid(_))
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Valid(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            RecordDate::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

// ── TransactionRecord ─────────────────────────────────────────────────────────

/// One dividend payment event from the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Ticker / trading symbol.
    pub symbol: String,
    /// Security registry identifier.
    pub isin: String,
    /// Payment date.
    pub date: RecordDate,
    /// Shares held at payment time.
    pub quantity: f64,
    /// Gross payout per share.
    pub dividend_per_share: f64,
    /// Net payout for this record after withholding. This is the value every
    /// aggregation sums.
    pub net_dividend_amount: f64,
}

impl TransactionRecord {
    /// Build a record from the three fields the aggregations care about.
    ///
    /// `date` is parsed with [`crate::time_utils::parse_record_date`].
    pub fn new(symbol: impl Into<String>, date: &str, net_dividend_amount: f64) -> Self {
        Self {
            symbol: symbol.into(),
            isin: UNKNOWN.to_string(),
            date: crate::time_utils::parse_record_date(date),
            quantity: 0.0,
            dividend_per_share: 0.0,
            net_dividend_amount,
        }
    }
}

// ── Granularity ───────────────────────────────────────────────────────────────

/// Time-bucketing resolution for aggregation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    /// All variants in display order.
    pub const ALL: [Granularity; 3] = [
        Granularity::Monthly,
        Granularity::Quarterly,
        Granularity::Yearly,
    ];

    /// The next granularity, wrapping from yearly back to monthly.
    pub fn next(self) -> Self {
        match self {
            Granularity::Monthly => Granularity::Quarterly,
            Granularity::Quarterly => Granularity::Yearly,
            Granularity::Yearly => Granularity::Monthly,
        }
    }

    /// Capitalised name used in titles.
    pub fn title(self) -> &'static str {
        match self {
            Granularity::Monthly => "Monthly",
            Granularity::Quarterly => "Quarterly",
            Granularity::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

// ── BucketKey ─────────────────────────────────────────────────────────────────

/// Grouping key of one time bucket.
///
/// The derived ordering is chronological within a granularity, and the
/// invalid-date bucket sorts after every dated bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
    Undated,
}

impl BucketKey {
    /// Bucket for a calendar date at the given granularity.
    pub fn for_naive_date(date: NaiveDate, granularity: Granularity) -> Self {
        let year = date.year();
        let month = date.month();
        match granularity {
            Granularity::Monthly => BucketKey::Month { year, month },
            Granularity::Quarterly => BucketKey::Quarter {
                year,
                quarter: quarter_of(month),
            },
            Granularity::Yearly => BucketKey::Year(year),
        }
    }

    /// Bucket for a record date; invalid dates land in [`BucketKey::Undated`].
    pub fn for_date(date: &RecordDate, granularity: Granularity) -> Self {
        match date {
            RecordDate::Valid(d) => Self::for_naive_date(*d, granularity),
            RecordDate::Invalid(_) => BucketKey::Undated,
        }
    }

    /// The quarter containing a monthly key; `None` for any other key.
    pub fn enclosing_quarter(&self) -> Option<BucketKey> {
        match *self {
            BucketKey::Month { year, month } => Some(BucketKey::Quarter {
                year,
                quarter: quarter_of(month),
            }),
            _ => None,
        }
    }

    pub fn is_undated(&self) -> bool {
        matches!(self, BucketKey::Undated)
    }
}

/// Quarter number (1–4) for a calendar month (1–12): `ceil(month / 3)`.
pub fn quarter_of(month: u32) -> u32 {
    month.div_ceil(3)
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            BucketKey::Quarter { year, quarter } => write!(f, "{:04}-Q{}", year, quarter),
            BucketKey::Year(year) => write!(f, "{:04}", year),
            BucketKey::Undated => f.write_str(INVALID_DATE_LABEL),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── ChartKind ─────────────────────────────────────────────────────────────────

/// How the trend chart is drawn. Display-only; never affects computation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl ChartKind {
    pub fn toggle(self) -> Self {
        match self {
            ChartKind::Line => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Line,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => f.write_str("line"),
            ChartKind::Bar => f.write_str("bar"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // ── SheetCell ─────────────────────────────────────────────────────────────

    #[test]
    fn test_sheet_cell_as_text_trims() {
        assert_eq!(SheetCell::text("  TCS ").as_text(), Some("TCS".to_string()));
        assert_eq!(SheetCell::text("").as_text(), None);
        assert_eq!(SheetCell::Number(42.0).as_text(), Some("42".to_string()));
        assert_eq!(
            SheetCell::Date(d(2024, 3, 5)).as_text(),
            Some("2024-03-05".to_string())
        );
    }

    // ── BucketKey formatting ──────────────────────────────────────────────────

    #[test]
    fn test_monthly_key_zero_padded() {
        let key = BucketKey::for_naive_date(d(2024, 1, 15), Granularity::Monthly);
        assert_eq!(key.to_string(), "2024-01");
        let key = BucketKey::for_naive_date(d(2024, 12, 31), Granularity::Monthly);
        assert_eq!(key.to_string(), "2024-12");
    }

    #[test]
    fn test_quarterly_key_uses_ceiling() {
        let cases = [
            (1, "2023-Q1"),
            (3, "2023-Q1"),
            (4, "2023-Q2"),
            (6, "2023-Q2"),
            (7, "2023-Q3"),
            (9, "2023-Q3"),
            (10, "2023-Q4"),
            (12, "2023-Q4"),
        ];
        for (month, expected) in cases {
            let key = BucketKey::for_naive_date(d(2023, month, 1), Granularity::Quarterly);
            assert_eq!(key.to_string(), expected, "month {month}");
        }
    }

    #[test]
    fn test_yearly_key() {
        let key = BucketKey::for_naive_date(d(2022, 8, 9), Granularity::Yearly);
        assert_eq!(key.to_string(), "2022");
    }

    #[test]
    fn test_invalid_date_goes_to_undated_bucket() {
        let date = RecordDate::Invalid("not a date".to_string());
        for g in Granularity::ALL {
            let key = BucketKey::for_date(&date, g);
            assert!(key.is_undated());
            assert_eq!(key.to_string(), INVALID_DATE_LABEL);
        }
    }

    #[test]
    fn test_bucket_ordering_is_chronological_with_undated_last() {
        let mut keys = vec![
            BucketKey::Undated,
            BucketKey::Month { year: 2024, month: 2 },
            BucketKey::Month { year: 2023, month: 11 },
            BucketKey::Month { year: 2024, month: 1 },
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2023-11", "2024-01", "2024-02", "Invalid Date"]);
    }

    #[test]
    fn test_enclosing_quarter() {
        let month = BucketKey::Month { year: 2024, month: 5 };
        assert_eq!(
            month.enclosing_quarter(),
            Some(BucketKey::Quarter { year: 2024, quarter: 2 })
        );
        assert_eq!(BucketKey::Year(2024).enclosing_quarter(), None);
    }

    #[test]
    fn test_bucket_key_serializes_as_label() {
        let json = serde_json::to_string(&BucketKey::Quarter { year: 2024, quarter: 3 }).unwrap();
        assert_eq!(json, "\"2024-Q3\"");
    }

    // ── RecordDate ────────────────────────────────────────────────────────────

    #[test]
    fn test_record_date_serializes_untagged() {
        let valid = serde_json::to_string(&RecordDate::Valid(d(2024, 1, 15))).unwrap();
        assert_eq!(valid, "\"2024-01-15\"");
        let invalid = serde_json::to_string(&RecordDate::Invalid("??".to_string())).unwrap();
        assert_eq!(invalid, "\"??\"");
    }

    // ── Granularity / ChartKind ───────────────────────────────────────────────

    #[test]
    fn test_granularity_cycles() {
        assert_eq!(Granularity::Monthly.next(), Granularity::Quarterly);
        assert_eq!(Granularity::Quarterly.next(), Granularity::Yearly);
        assert_eq!(Granularity::Yearly.next(), Granularity::Monthly);
    }

    #[test]
    fn test_granularity_display() {
        assert_eq!(Granularity::Quarterly.to_string(), "quarterly");
        assert_eq!(Granularity::Yearly.title(), "Yearly");
    }

    #[test]
    fn test_chart_kind_toggle() {
        assert_eq!(ChartKind::Line.toggle(), ChartKind::Bar);
        assert_eq!(ChartKind::Bar.toggle(), ChartKind::Line);
    }

    #[test]
    fn test_record_constructor_parses_date() {
        let r = TransactionRecord::new("X", "2024-01-15", 100.0);
        assert_eq!(r.date, RecordDate::Valid(d(2024, 1, 15)));
        assert_eq!(r.isin, UNKNOWN);
    }
}
