use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::models::{RecordDate, UNKNOWN};

// ── Date text parsing ─────────────────────────────────────────────────────────

/// Date-only formats seen in broker dividend exports, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%Y/%m/%d",
];

/// Date-time formats whose time component is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d-%m-%Y %H:%M:%S"];

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Parse free-form date text into a calendar date.
///
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    trace!("unrecognised date text \"{}\"", s);
    None
}

/// Parse date text into a [`RecordDate`], keeping the raw text on failure.
///
/// Blank input becomes `Invalid("Unknown")`, matching the string-field
/// default of the row parser.
pub fn parse_record_date(s: &str) -> RecordDate {
    if s.trim().is_empty() {
        return RecordDate::Invalid(UNKNOWN.to_string());
    }
    match parse_date_text(s) {
        Some(d) => RecordDate::Valid(d),
        None => RecordDate::Invalid(s.trim().to_string()),
    }
}

/// Excel serial date conversion using the 1899-12-30 base.
///
/// Fractional days (time of day) are dropped. Returns `None` for non-finite
/// values and for serials outside `1..=2958465`.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Short month plus year, e.g. `"Jan 2024"`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Long human form used in stat cards, e.g. `"15 Jan 2024"`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date_text("2024-01-15"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_parse_iso_datetime_drops_time() {
        assert_eq!(parse_date_text("2024-01-15 10:30:00"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date_text("2024-01-15T23:59:59"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_date_text("2024-06-30T08:00:00+05:30"),
            Some(d(2024, 6, 30))
        );
    }

    #[test]
    fn test_parse_day_first_formats() {
        assert_eq!(parse_date_text("15-01-2024"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date_text("15/01/2024"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date_text("15-Jan-2024"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date_text("15 Jan 2024"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_parse_month_first_long_format() {
        assert_eq!(parse_date_text("Jan 15, 2024"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date_text("  2023-12-01 "), Some(d(2023, 12, 1)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date_text("yesterday"), None);
        assert_eq!(parse_date_text("2024-13-01"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn test_parse_record_date_keeps_raw_text() {
        assert_eq!(
            parse_record_date(" soon "),
            RecordDate::Invalid("soon".to_string())
        );
        assert_eq!(
            parse_record_date(""),
            RecordDate::Invalid("Unknown".to_string())
        );
        assert_eq!(parse_record_date("2024-02-29"), RecordDate::Valid(d(2024, 2, 29)));
    }

    #[test]
    fn test_excel_serial_to_date() {
        // 45306 is 2024-01-15 in the 1900 date system.
        assert_eq!(excel_serial_to_date(45306.0), Some(d(2024, 1, 15)));
        // Time-of-day fraction is ignored.
        assert_eq!(excel_serial_to_date(45306.75), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_excel_serial_out_of_range() {
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-5.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(3_000_000.0), None);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(d(2024, 1, 15)), "Jan 2024");
        assert_eq!(month_label(d(2023, 9, 1)), "Sep 2023");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(d(2024, 3, 5)), "05 Mar 2024");
    }
}
