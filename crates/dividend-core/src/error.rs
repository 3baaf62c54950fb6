use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the dividend visualizer.
#[derive(Error, Debug)]
pub enum DividendError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of the accepted workbook formats.
    #[error("Unsupported file type: {0} (expected .xlsx, .xlsm, .xlsb, .xls or .ods)")]
    UnsupportedFileType(PathBuf),

    /// The bytes could not be decoded as a workbook at all.
    #[error("Failed to decode workbook: {0}")]
    Workbook(String),

    /// The workbook decoded but contains no worksheet.
    #[error("Workbook has no sheets: {0}")]
    EmptyWorkbook(PathBuf),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Raw mode, the alternate screen or a draw call failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the dividend crates.
pub type Result<T> = std::result::Result<T, DividendError>;
