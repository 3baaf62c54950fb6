mod bootstrap;

use anyhow::{Context, Result};
use dividend_core::settings::{OutputMode, Settings};
use dividend_data::analysis::ViewOptions;
use dividend_runtime::loader::{load_statement_async, StatementLoader};
use dividend_runtime::session::DividendSession;
use dividend_ui::app::App;
use dividend_ui::report::render_report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Dividends Visualizer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Granularity: {}, Chart: {}, Output: {:?}",
        settings.file.display(),
        settings.granularity,
        settings.chart,
        settings.output
    );

    let options = ViewOptions {
        granularity: settings.granularity,
        symbol: None,
        top_n: settings.top_n,
    };

    match settings.output {
        OutputMode::Tui => {
            let (mut loader, rx, handle) = StatementLoader::start();
            loader.request(settings.file.clone())?;

            let app = App::new(
                &settings.theme,
                settings.chart,
                settings.currency.clone(),
                settings.file.clone(),
                DividendSession::new(options),
                settings.symbol.clone(),
            );

            // The TUI handles 'q' / Ctrl+C itself; the OS-level signal covers
            // the window before raw mode is entered.
            tokio::select! {
                result = app.run(loader, rx) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; stopping loader");
                    handle.abort();
                }
            }
        }

        OutputMode::Text | OutputMode::Json => {
            let parsed = load_statement_async(&settings.file)
                .await
                .with_context(|| format!("failed to load {}", settings.file.display()))?;

            let mut session = DividendSession::new(options);
            session.replace_records(parsed.records, Some(settings.file.clone()));
            session.set_symbol(settings.symbol.clone());

            let snapshot = session.snapshot();
            if let Some(symbol) = session.selected_symbol() {
                if !snapshot.symbols.iter().any(|s| s == symbol) {
                    tracing::warn!("Symbol {} does not appear in the statement", symbol);
                }
            }

            if settings.output == OutputMode::Json {
                println!("{}", snapshot.to_json_pretty()?);
            } else {
                let source = settings
                    .file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                print!(
                    "{}",
                    render_report(&snapshot, source.as_deref(), &settings.currency, settings.chart)
                );
            }
        }
    }

    Ok(())
}
