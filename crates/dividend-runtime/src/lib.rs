//! Runtime layer for the dividend visualizer.
//!
//! Owns the loaded record list and view selections ([`session`]) and moves
//! workbook decoding off the UI thread ([`loader`]).

pub mod loader;
pub mod session;

pub use dividend_core as core;
pub use dividend_data as data;
