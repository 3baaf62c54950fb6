//! Async statement loader.
//!
//! Runs in a tokio task. Each [`StatementLoader::request`] reads the file
//! asynchronously, decodes it on a blocking thread and sends a [`LoadEvent`]
//! tagged with the request's generation. Loads run concurrently and may
//! finish out of order; consumers use the generation to drop stale results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use dividend_core::error::{DividendError, Result};
use dividend_data::parser::ParsedSheet;
use dividend_data::reader::{ensure_supported, parse_statement_bytes};
use tokio::sync::mpsc;

/// Capacity of the event channel.
const EVENT_BUFFER: usize = 16;

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of one load request.
#[derive(Debug)]
pub struct LoadEvent {
    /// Monotonic request number; larger is newer.
    pub generation: u64,
    pub path: PathBuf,
    pub outcome: Result<ParsedSheet>,
    /// Wall-clock seconds from request to result.
    pub elapsed_seconds: f64,
}

#[derive(Debug)]
struct LoadRequest {
    generation: u64,
    path: PathBuf,
}

// ── StatementLoader ───────────────────────────────────────────────────────────

/// Request side of the background loader.
///
/// Call [`StatementLoader::start`] to spawn the loader task and receive a
/// channel endpoint for [`LoadEvent`]s.
pub struct StatementLoader {
    requests: mpsc::UnboundedSender<LoadRequest>,
    next_generation: u64,
}

impl StatementLoader {
    /// Spawn the loader task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start() -> (Self, mpsc::Receiver<LoadEvent>, LoaderHandle) {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let handle = tokio::spawn(async move {
            loader_loop(req_rx, event_tx).await;
        });

        let loader = Self {
            requests: req_tx,
            next_generation: 1,
        };
        (loader, event_rx, LoaderHandle { handle })
    }

    /// Queue a load of `path` and return its generation number.
    pub fn request(&mut self, path: impl Into<PathBuf>) -> Result<u64> {
        let generation = self.next_generation;
        self.next_generation += 1;

        let path = path.into();
        tracing::debug!(generation, path = %path.display(), "queueing statement load");
        self.requests
            .send(LoadRequest { generation, path })
            .map_err(|_| DividendError::Config("statement loader has stopped".to_string()))?;
        Ok(generation)
    }
}

// ── LoaderHandle ──────────────────────────────────────────────────────────────

/// A handle to the background loader task.
pub struct LoaderHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl LoaderHandle {
    /// Immediately abort the loader task. In-flight loads are dropped.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── One-shot loading ──────────────────────────────────────────────────────────

/// Read and parse a statement without the background task.
///
/// The file type is checked before any bytes are read; decoding runs on a
/// blocking thread.
pub async fn load_statement_async(path: &Path) -> Result<ParsedSheet> {
    ensure_supported(path)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DividendError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let origin = path.to_path_buf();
    tokio::task::spawn_blocking(move || parse_statement_bytes(bytes, &origin))
        .await
        .map_err(|e| DividendError::Workbook(format!("decoder task failed: {e}")))?
}

// ── Private implementation ────────────────────────────────────────────────────

/// Receive requests until every [`StatementLoader`] is dropped.
async fn loader_loop(
    mut requests: mpsc::UnboundedReceiver<LoadRequest>,
    events: mpsc::Sender<LoadEvent>,
) {
    while let Some(request) = requests.recv().await {
        let events = events.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = load_statement_async(&request.path).await;

            match &outcome {
                Ok(parsed) => tracing::debug!(
                    generation = request.generation,
                    records = parsed.records.len(),
                    "statement load finished"
                ),
                Err(e) => tracing::warn!(
                    generation = request.generation,
                    error = %e,
                    "statement load failed"
                ),
            }

            let event = LoadEvent {
                generation: request.generation,
                path: request.path,
                outcome,
                elapsed_seconds: started.elapsed().as_secs_f64(),
            };
            if events.send(event).await.is_err() {
                tracing::debug!("load event receiver dropped");
            }
        });
    }
    tracing::debug!("statement loader request channel closed; exiting loop");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
