//! Core domain types for the dividend visualizer.
//!
//! Holds the transaction record model, time-bucket keys, date parsing,
//! number formatting, CLI settings and the shared error type used by every
//! other crate in the workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
