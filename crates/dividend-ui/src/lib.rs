//! Terminal UI layer for the dividend visualizer.
//!
//! Provides themes, share bars, header and stat-card components, the
//! dashboard and bucket table views, a plain-text report and the main
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod report;
pub mod table_view;
pub mod themes;

pub use dividend_core as core;
