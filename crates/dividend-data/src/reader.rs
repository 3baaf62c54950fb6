//! Workbook decoding for dividend statements.
//!
//! Opens a spreadsheet with `calamine`, takes the first worksheet and turns
//! its used range into positional rows of [`SheetCell`]s for the parser.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use dividend_core::error::{DividendError, Result};
use dividend_core::models::{SheetCell, TransactionRecord};
use dividend_core::time_utils::{excel_serial_to_date, parse_date_text};
use tracing::{debug, warn};

use crate::parser::{parse_sheet, ParsedSheet};

/// File extensions accepted as statement workbooks, lower-case.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Reject any path whose extension is not a supported workbook format.
///
/// This runs before any bytes are read.
pub fn ensure_supported(path: &Path) -> Result<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(DividendError::UnsupportedFileType(path.to_path_buf()))
    }
}

/// Read the first worksheet of the workbook at `path` as positional rows.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<SheetCell>>> {
    ensure_supported(path)?;
    let bytes = std::fs::read(path).map_err(|source| DividendError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_first_sheet_from_bytes(bytes, path)
}

/// Decode an in-memory workbook. `origin` is only used in error messages.
pub fn read_first_sheet_from_bytes(bytes: Vec<u8>, origin: &Path) -> Result<Vec<Vec<SheetCell>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DividendError::Workbook(format!("{}: {}", origin.display(), e)))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            return Err(DividendError::Workbook(format!(
                "{}: {}",
                origin.display(),
                e
            )))
        }
        None => return Err(DividendError::EmptyWorkbook(origin.to_path_buf())),
    };

    let rows = range_to_rows(&range);
    debug!(
        "Read {} non-empty rows from first sheet of {}",
        rows.len(),
        origin.display()
    );
    Ok(rows)
}

/// Decode and parse an in-memory statement.
pub fn parse_statement_bytes(bytes: Vec<u8>, origin: &Path) -> Result<ParsedSheet> {
    let start = Instant::now();
    let rows = read_first_sheet_from_bytes(bytes, origin)?;
    let parsed = parse_sheet(&rows);
    log_parse_outcome(&parsed, origin, start);
    Ok(parsed)
}

/// Read, decode and parse the statement at `path`.
pub fn load_statement(path: &Path) -> Result<Vec<TransactionRecord>> {
    let start = Instant::now();
    let rows = read_first_sheet(path)?;
    let parsed = parse_sheet(&rows);
    log_parse_outcome(&parsed, path, start);
    Ok(parsed.records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert the used range into rows indexed from column A.
///
/// `calamine` trims leading empty columns off the used range; those are
/// padded back so positional indices match the sheet's own columns.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<SheetCell>> {
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|row| {
            let mut cells = Vec::with_capacity(col_offset + row.len());
            cells.resize(col_offset, SheetCell::Empty);
            cells.extend(row.iter().map(convert_cell));
            cells
        })
        .collect()
}

fn convert_cell(cell: &Data) -> SheetCell {
    match cell {
        Data::Empty | Data::Error(_) => SheetCell::Empty,
        Data::String(s) => SheetCell::Text(s.clone()),
        Data::Float(f) => SheetCell::Number(*f),
        Data::Int(i) => SheetCell::Number(*i as f64),
        Data::Bool(b) => SheetCell::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(date) => SheetCell::Date(date),
            None => SheetCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_date_text(s) {
            Some(date) => SheetCell::Date(date),
            None => SheetCell::Text(s.clone()),
        },
        Data::DurationIso(s) => SheetCell::Text(s.clone()),
    }
}

fn log_parse_outcome(parsed: &ParsedSheet, origin: &Path, start: Instant) {
    let undated = parsed
        .records
        .iter()
        .filter(|r| !r.date.is_valid())
        .count();
    if undated > 0 {
        warn!(
            "{} of {} records in {} have an unparseable date",
            undated,
            parsed.records.len(),
            origin.display()
        );
    }
    debug!(
        "Parsed {} records from {} rows of {} in {:.1}ms",
        parsed.records.len(),
        parsed.rows_read,
        display_name(origin),
        start.elapsed().as_secs_f64() * 1000.0
    );
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
