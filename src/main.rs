//! magicwatch - directory watcher for a magic string
//!
//! Entry point: parses arguments, sets up logging and signals, then polls
//! until interrupted.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;

use clap::Parser;
use magicwatch::supervisor::{init_tracing, spawn_signal_handler, TracingConfig};
use magicwatch::watcher::{PollLoop, RunState};
use magicwatch::Config;

/// Watches a directory for text files containing a magic string
#[derive(Parser, Debug)]
#[command(name = "magicwatch")]
#[command(author, version, about, long_about = None)]
#[command(allow_missing_positional = true)]
struct Cli {
    /// Directory to watch
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Magic string to search for
    magic: String,

    /// Extension of files to search
    #[arg(short, long, default_value = ".txt")]
    ext: String,

    /// Polling interval in seconds
    #[arg(short = 'i', long = "int", value_name = "SECONDS", allow_negative_numbers = true)]
    interval: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MAGICWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "MAGICWATCH_LOG_JSON")]
    log_json: bool,

    /// Also write logs to this file
    #[arg(long, env = "MAGICWATCH_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            watch_dir: self.path,
            magic: self.magic,
            extension: self.ext,
            interval_secs: self.interval,
            log_level: self.log_level,
            log_json: self.log_json,
            log_file: self.log_file,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config();

    // Configuration errors end the process before anything runs
    config.validate()?;

    let tracing_config = TracingConfig {
        level: config.log_level.clone(),
        json: config.log_json,
    };
    let _log_guard = init_tracing(&tracing_config, config.log_file.as_deref())?;

    tracing::info!("magicwatch v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?config, "Configuration loaded");

    let run_state = RunState::new();
    let signals = spawn_signal_handler(run_state.clone());

    let mut poll = PollLoop::new(&config, run_state)?;
    tracing::info!(
        interval_ms = u64::try_from(poll.interval().as_millis()).unwrap_or(u64::MAX),
        "Polling every {:?}",
        poll.interval()
    );
    poll.run().await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["magicwatch", "ERROR", "-i", "1"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.magic, "ERROR");
        assert_eq!(cli.ext, ".txt");
        assert_eq!(cli.interval, Some(1.0));
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_full() {
        let cli = Cli::try_parse_from([
            "magicwatch",
            "/var/log/app",
            "panic",
            "--ext",
            ".log",
            "--int",
            "0.5",
            "--log-file",
            "watch.log",
        ])
        .unwrap();
        let config = cli.into_config();

        assert_eq!(config.watch_dir, PathBuf::from("/var/log/app"));
        assert_eq!(config.magic, "panic");
        assert_eq!(config.extension, ".log");
        assert_eq!(config.interval_secs, Some(0.5));
        assert_eq!(config.log_file, Some(PathBuf::from("watch.log")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_requires_magic() {
        assert!(Cli::try_parse_from(["magicwatch"]).is_err());
    }

    #[test]
    fn test_missing_interval_is_config_error() {
        let config = Cli::try_parse_from(["magicwatch", "ERROR"])
            .unwrap()
            .into_config();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_negative_interval_reaches_validation() {
        let config = Cli::try_parse_from(["magicwatch", "ERROR", "-i", "-2"])
            .unwrap()
            .into_config();
        assert_eq!(config.interval_secs, Some(-2.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
