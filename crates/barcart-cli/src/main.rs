//! barcart - a command-line cocktail companion.
//!
//! Browse TheCocktailDB, keep a favorites list and a taste profile on the
//! device, and see a small dashboard of what you have tried.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use barcart_core::{
    ApiClient, Config, FavoritesRepository, FileStore, KeyValueStore, ProfileRepository, Session,
};

use commands::App;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and, when the log directory is usable, to a daily
/// rolling file. The returned guard must live until exit so buffered file
/// output is flushed.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file = config.log_dir().ok().and_then(|dir| {
        Builder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix("barcart")
            .filename_suffix("log")
            .build(dir)
            .ok()
    });

    match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let _log_guard = init_tracing(&config);
    info!("barcart starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        commands::print_usage();
        return Ok(());
    }
    if args[0] == "config" {
        return commands::configure(&args[1..]);
    }

    let data_dir = config.data_dir()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::new(&data_dir)
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?,
    );
    let api = ApiClient::with_base_url(config.api_base_url())?;

    let app = App {
        api,
        favorites: FavoritesRepository::new(store.clone()),
        session: Session::new(ProfileRepository::new(store)),
        random_count: config.random_count(),
    };

    app.session.initialize().await;
    app.session.record_session();

    let result = commands::run(&app, &args).await;

    // Stats are saved in the background; let pending writes land before exit
    app.session.flush().await;

    if let Err(ref e) = result {
        warn!(error = %e, "Command failed");
    }
    info!("barcart shutting down");
    result
}
