use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{DividendError, Result};
use crate::formatting::DEFAULT_CURRENCY;
use crate::models::{ChartKind, Granularity};

/// Number of symbols shown individually before the rest collapse into
/// "Others".
pub const DEFAULT_TOP_N: usize = 5;

// ── OutputMode ────────────────────────────────────────────────────────────────

/// Where the dashboard is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Interactive terminal dashboard.
    #[default]
    Tui,
    /// Plain-text report on stdout.
    Text,
    /// JSON snapshot on stdout.
    Json,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Visualize a broker dividend statement exported as a spreadsheet
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dividend-viz",
    about = "Dividends calculator & visualizer for spreadsheet statements",
    version
)]
pub struct Settings {
    /// Dividend statement workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
    pub file: PathBuf,

    /// Time bucket used by the trend chart and bucket table
    #[arg(long, value_enum, default_value_t = Granularity::Monthly)]
    pub granularity: Granularity,

    /// Trend chart style
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    pub chart: ChartKind,

    /// Restrict stats, trends and distribution to one symbol
    #[arg(long)]
    pub symbol: Option<String>,

    /// Symbols listed individually in the distribution before "Others"
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Output mode
    #[arg(long, value_enum, default_value_t = OutputMode::Tui)]
    pub output: OutputMode,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Currency symbol prefixed to amounts
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Logging level
    #[arg(long, default_value = "INFO", env = "DIVIDEND_VIZ_LOG", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (stderr when absent)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings = Settings::parse_from(args);
        settings.resolve()
    }

    /// Apply the `--debug` override and validate cross-field constraints.
    fn resolve(mut self) -> Result<Self> {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        if self.top_n == 0 {
            return Err(DividendError::Config(
                "--top-n must be at least 1".to_string(),
            ));
        }

        self.symbol = self
            .symbol
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(self)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
