//! Captain's Log: a voice journal for the terminal.

mod app;
mod app_command;
mod config;
mod error;
mod state_view;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::{path::Path, sync::Arc};

use captain_log_core::{CpalBackend, RecordingSession, StubTranscriber};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const DEFAULT_LOG_FILTER: &str = "captain_log=info,captain_log_core=info";
const LOG_FILE_PREFIX: &str = "captain-log.log";

/// Application entry point.
#[tokio::main]
async fn main() {
    let log_guard = match Config::log_dir() {
        Ok(log_dir) => init_tracing(&log_dir),
        Err(e) => {
            eprintln!("Failed to prepare log directory: {}", e.user_message());
            std::process::exit(1);
        }
    };

    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = ?e, "Captain's Log failed");
            eprintln!("{}", e.user_message());
            1
        }
    };

    // Flush the file writer before exiting.
    drop(log_guard);
    std::process::exit(code);
}

async fn run() -> AppResult<()> {
    let config = Config::load()?;
    config.prepare_directories()?;

    let session = RecordingSession::new(
        Arc::new(CpalBackend::new()),
        Arc::new(StubTranscriber::new(config.transcription.delay())),
        config.session.clone(),
    )?;

    info!(
        journal = ?config.journal.directory,
        scratch_file = ?config.journal.scratch_file,
        "Session ready"
    );

    App::new(session, config).run().await
}

/// JSON logs to a daily file, warnings and above to stderr.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    guard
}
