//! Structured logging configuration.
//!
//! Provides setup for the `tracing` subscriber with:
//! - Configurable log levels (overridden by `RUST_LOG`)
//! - Plain text or JSON console output
//! - An optional plain-text log file

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    Layer, Registry,
};

use crate::{Error, Result};

/// Tracing configuration options.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Initialize tracing.
///
/// Console output goes to stderr. When `log_file` is set, every line is also
/// appended to that file without ANSI colors. The returned guard flushes the
/// file writer and must be held until the process exits.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a tracing subscriber has already been initialized in this process.
pub fn init_tracing(
    config: &TracingConfig,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_sink, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    if config.json {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);

        Registry::default()
            .with(env_filter)
            .with(json_layer)
            .with(file_sink.map(file_layer))
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr);

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_sink.map(file_layer))
            .init();
    }

    tracing::debug!(
        "Tracing initialized: level={}, json={}, file={:?}",
        config.level,
        config.json,
        log_file
    );

    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::config(format!("invalid log file name '{}'", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| {
            Error::config(format!("cannot open log file '{}': {e}", path.display()))
        })?;
    Ok(tracing_appender::non_blocking(appender))
}

fn file_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_config_default() {
        let config = TracingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_file_writer_rejects_bare_root() {
        assert!(file_writer(Path::new("/")).is_err());
    }

    #[test]
    fn test_file_writer_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("magicwatch.log");
        let (_writer, _guard) = file_writer(&path).unwrap();
        assert!(path.exists());
    }
}
