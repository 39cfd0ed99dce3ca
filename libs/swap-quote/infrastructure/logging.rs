//! Logging initialization

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter_for(level: &str) -> EnvFilter {
    // RUST_LOG wins over the configured level
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()))
}

/// Initialize tracing to stdout with a specific log level
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();
}

/// Initialize tracing into an append-only log file
///
/// Used by the terminal form, where writing to stdout would corrupt the
/// alternate screen.
pub fn init_file_tracing(level: &str, path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    Ok(())
}
