//! Data layer for the dividend visualizer.
//!
//! Responsible for decoding statement workbooks, locating the data region
//! inside the export, mapping rows into [`TransactionRecord`]s, aggregating
//! them by time bucket and symbol, and extracting summary insights.
//!
//! [`TransactionRecord`]: dividend_core::models::TransactionRecord

pub mod aggregator;
pub mod analysis;
pub mod insights;
pub mod parser;
pub mod reader;

pub use dividend_core as core;
