//! Application state and TUI event loop for the dividend visualizer.
//!
//! [`App`] owns the theme, the chart style and the [`DividendSession`]. It
//! drains [`LoadEvent`]s from the background loader, maps key presses onto
//! session selections and redraws the dashboard on every tick.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use dividend_core::error::{DividendError, Result};
use dividend_core::models::{ChartKind, Granularity};
use dividend_runtime::loader::{LoadEvent, StatementLoader};
use dividend_runtime::session::{ApplyOutcome, DividendSession};

use crate::dashboard_view::{self, DashboardViewData};
use crate::table_view;
use crate::themes::Theme;

// ── KeyOutcome ────────────────────────────────────────────────────────────────

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Selections may have changed; redraw.
    Continue,
    /// Queue a fresh load of the statement file.
    Reload,
    Quit,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dividend dashboard.
pub struct App {
    pub theme: Theme,
    pub chart: ChartKind,
    /// Currency symbol prefixed to amounts.
    pub currency: String,
    /// Statement reloaded by `r`.
    pub file: PathBuf,
    pub session: DividendSession,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Symbol from the command line, applied once the first load succeeds.
    pending_symbol: Option<String>,
    /// Footer message; replaces the key help while set.
    status: Option<String>,
}

impl App {
    pub fn new(
        theme_name: &str,
        chart: ChartKind,
        currency: String,
        file: PathBuf,
        session: DividendSession,
        initial_symbol: Option<String>,
    ) -> Self {
        let status = Some(format!("Loading {}…", file.display()));
        Self {
            theme: Theme::from_name(theme_name),
            chart,
            currency,
            file,
            session,
            should_quit: false,
            pending_symbol: initial_symbol,
            status,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Ctrl+C` or the loader goes away.
    ///
    /// Key events are polled synchronously with a 250 ms timeout; load
    /// results are drained from `rx` with `try_recv` between polls. Terminal
    /// failures surface as [`DividendError::Terminal`].
    pub async fn run(self, loader: StatementLoader, rx: mpsc::Receiver<LoadEvent>) -> Result<()> {
        self.run_terminal(loader, rx).map_err(terminal_error)
    }

    fn run_terminal(
        mut self,
        mut loader: StatementLoader,
        mut rx: mpsc::Receiver<LoadEvent>,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    match self.handle_key(key) {
                        KeyOutcome::Quit => break Ok(()),
                        KeyOutcome::Reload => self.request_reload(&mut loader),
                        KeyOutcome::Continue => {}
                    }
                }
            }

            loop {
                match rx.try_recv() {
                    Ok(event) => self.apply_load_event(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Map a key press onto the session. Key releases are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyOutcome::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyOutcome::Quit,
            KeyCode::Char('1') => {
                self.session.set_granularity(Granularity::Monthly);
                KeyOutcome::Continue
            }
            KeyCode::Char('2') => {
                self.session.set_granularity(Granularity::Quarterly);
                KeyOutcome::Continue
            }
            KeyCode::Char('3') => {
                self.session.set_granularity(Granularity::Yearly);
                KeyOutcome::Continue
            }
            KeyCode::Char('g') => {
                self.session.cycle_granularity();
                KeyOutcome::Continue
            }
            KeyCode::Char('c') => {
                self.chart = self.chart.toggle();
                KeyOutcome::Continue
            }
            KeyCode::Right => {
                self.session.cycle_symbol(true);
                KeyOutcome::Continue
            }
            KeyCode::Left => {
                self.session.cycle_symbol(false);
                KeyOutcome::Continue
            }
            KeyCode::Char('a') => {
                self.session.clear_symbol();
                KeyOutcome::Continue
            }
            KeyCode::Char('r') => KeyOutcome::Reload,
            _ => KeyOutcome::Continue,
        }
    }

    fn request_reload(&mut self, loader: &mut StatementLoader) {
        match loader.request(self.file.clone()) {
            Ok(generation) => {
                tracing::info!(generation, "reloading {}", self.file.display());
                self.status = Some(format!("Reloading {}…", self.file.display()));
            }
            Err(e) => {
                tracing::error!("reload request failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Hand a loader result to the session and update the footer.
    pub fn apply_load_event(&mut self, event: LoadEvent) {
        let elapsed = event.elapsed_seconds;
        match self.session.apply_event(event) {
            ApplyOutcome::Applied { records } => {
                tracing::info!(records, "statement loaded in {:.2}s", elapsed);
                if let Some(symbol) = self.pending_symbol.take() {
                    self.session.set_symbol(Some(symbol));
                }
                self.status = None;
            }
            ApplyOutcome::Failed(message) => {
                self.status = Some(format!("Load failed: {message}"));
            }
            ApplyOutcome::Stale => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if !self.session.has_data() {
            table_view::render_no_data(frame, area, self.status.as_deref(), &self.theme);
            return;
        }

        let snapshot = self.session.snapshot();
        let source = self
            .session
            .source()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned());

        let data = DashboardViewData {
            snapshot: &snapshot,
            source: source.as_deref(),
            chart: self.chart,
            currency: &self.currency,
            status: self.status.as_deref(),
        };
        dashboard_view::render_dashboard(frame, area, &data, &self.theme);
    }
}

fn terminal_error(e: io::Error) -> DividendError {
    DividendError::Terminal(e.to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
