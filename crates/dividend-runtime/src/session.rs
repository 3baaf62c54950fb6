//! Single owner of the loaded records and the current view selections.
//!
//! Every view is recomputed from the record list on each
//! [`DividendSession::snapshot`] call; nothing derived is cached.

use std::path::{Path, PathBuf};

use dividend_core::models::{Granularity, TransactionRecord};
use dividend_data::aggregator::DividendAggregator;
use dividend_data::analysis::{analyze_dividends, DashboardSnapshot, ViewOptions};

use crate::loader::LoadEvent;

// ── ApplyOutcome ──────────────────────────────────────────────────────────────

/// What [`DividendSession::apply_event`] did with a load event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The records replaced the previous list.
    Applied { records: usize },
    /// The load failed; the previous list is kept.
    Failed(String),
    /// A newer generation was already applied; the event was dropped.
    Stale,
}

// ── DividendSession ───────────────────────────────────────────────────────────

/// Record list plus granularity, symbol filter and top-N selections.
#[derive(Debug, Clone, Default)]
pub struct DividendSession {
    records: Vec<TransactionRecord>,
    options: ViewOptions,
    source: Option<PathBuf>,
    /// Generation of the last load event accepted.
    applied_generation: u64,
    last_error: Option<String>,
}

impl DividendSession {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn granularity(&self) -> Granularity {
        self.options.granularity
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.options.symbol.as_deref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Install a new record list, discarding the previous one and resetting
    /// the symbol selection. Granularity and top-N are view settings and are
    /// kept.
    pub fn replace_records(&mut self, records: Vec<TransactionRecord>, source: Option<PathBuf>) {
        tracing::debug!(records = records.len(), "session records replaced");
        self.records = records;
        self.source = source;
        self.options.symbol = None;
        self.last_error = None;
    }

    /// Apply a loader event unless a newer generation has already been
    /// applied.
    pub fn apply_event(&mut self, event: LoadEvent) -> ApplyOutcome {
        if event.generation <= self.applied_generation {
            tracing::debug!(
                generation = event.generation,
                applied = self.applied_generation,
                "dropping stale load event"
            );
            return ApplyOutcome::Stale;
        }
        self.applied_generation = event.generation;

        match event.outcome {
            Ok(parsed) => {
                let count = parsed.records.len();
                self.replace_records(parsed.records, Some(event.path));
                ApplyOutcome::Applied { records: count }
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                ApplyOutcome::Failed(message)
            }
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.options.granularity = granularity;
    }

    /// Advance monthly → quarterly → yearly → monthly.
    pub fn cycle_granularity(&mut self) {
        self.options.granularity = self.options.granularity.next();
    }

    /// Select one symbol, or `None` for all. Blank input clears the filter.
    pub fn set_symbol(&mut self, symbol: Option<String>) {
        self.options.symbol = symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    }

    pub fn clear_symbol(&mut self) {
        self.options.symbol = None;
    }

    /// Step through "all symbols" followed by each symbol alphabetically.
    ///
    /// `forward = false` steps backwards. Wraps at both ends.
    pub fn cycle_symbol(&mut self, forward: bool) {
        let symbols = DividendAggregator::unique_symbols(&self.records);
        if symbols.is_empty() {
            self.options.symbol = None;
            return;
        }

        // Position 0 is "all"; symbol i sits at i + 1.
        let slots = symbols.len() + 1;
        let current = self
            .options
            .symbol
            .as_ref()
            .and_then(|s| symbols.iter().position(|x| x == s))
            .map(|i| i + 1)
            .unwrap_or(0);

        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };

        self.options.symbol = next.checked_sub(1).map(|i| symbols[i].clone());
    }

    pub fn set_top_n(&mut self, top_n: usize) {
        self.options.top_n = top_n.max(1);
    }

    // ── Views ─────────────────────────────────────────────────────────────

    /// Recompute every dashboard view from the current list.
    pub fn snapshot(&self) -> DashboardSnapshot {
        analyze_dividends(&self.records, &self.options)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
