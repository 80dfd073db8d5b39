//! Logging Infrastructure
//!
//! `tracing` subscriber setup: console output by default, daily rolling file
//! output when a log directory is configured and exists, JSON lines in
//! production.

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = log_dir.map(Path::new).filter(|p| p.exists());
    if let (Some(dir), None) = (log_dir, log_path) {
        eprintln!("Log directory {} does not exist, logging to stdout", dir);
    }
    let to_file = log_path.is_some();
    let writer = match log_path {
        Some(path) => BoxMakeWriter::new(tracing_appender::rolling::daily(path, "pickup-server")),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .with_ansi(!to_file && !json)
        .with_writer(writer);

    // try_init: tests may install a subscriber more than once
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
