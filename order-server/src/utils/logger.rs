//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.
//! `RUST_LOG` overrides the configured level when set.

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Log file prefix, files rotate daily (`order-server.2026-01-31`)
const LOG_FILE_PREFIX: &str = "order-server";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON format and file output
///
/// Files are only written when `log_dir` exists; otherwise logs go to stdout.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let filter = build_filter(log_level.unwrap_or("info"));
    let writer = log_dir
        .and_then(file_writer)
        .unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}

/// `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn file_writer(dir: &str) -> Option<BoxMakeWriter> {
    let path = Path::new(dir);
    if !path.is_dir() {
        return None;
    }
    let appender = tracing_appender::rolling::daily(path, LOG_FILE_PREFIX);
    Some(BoxMakeWriter::new(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_requires_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file_writer(dir.path().to_str().unwrap()).is_some());

        let missing = dir.path().join("missing");
        assert!(file_writer(missing.to_str().unwrap()).is_none());
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let filter = build_filter("not a level ===");
        assert!(!filter.to_string().is_empty());
    }
}
