//! Configuration settings and validation.

use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the directory watcher.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to poll.
    pub watch_dir: PathBuf,

    /// Substring to search for in each line.
    pub magic: String,

    /// File extension filter, with or without the leading dot.
    pub extension: String,

    /// Poll interval in seconds. Required; must be positive and finite.
    pub interval_secs: Option<f64>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of plain text.
    pub log_json: bool,

    /// Optional file that receives a copy of every log line.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("."),
            magic: String::new(),
            extension: ".txt".to_string(),
            interval_secs: None,
            log_level: "info".to_string(),
            log_json: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.magic.is_empty() {
            return Err(Error::config("magic string cannot be empty"));
        }

        if self.extension_key().is_empty() {
            return Err(Error::config("extension cannot be empty"));
        }

        match self.interval_secs {
            None => {
                return Err(Error::config(
                    "poll interval is required (-i/--int <SECONDS>)",
                ));
            }
            Some(secs) if !secs.is_finite() || secs <= 0.0 => {
                return Err(Error::config(format!(
                    "poll interval must be a positive number of seconds, got {secs}"
                )));
            }
            Some(secs) => {
                if Duration::try_from_secs_f64(secs).is_err() {
                    return Err(Error::config(format!("poll interval {secs} is too large")));
                }
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Poll interval as a `Duration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is missing or not a positive number.
    pub fn interval(&self) -> Result<Duration> {
        let secs = self
            .interval_secs
            .ok_or_else(|| Error::config("poll interval is required"))?;
        Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| Error::config(format!("invalid poll interval {secs}")))
    }

    /// Extension without its leading dot, as `Path::extension` reports it.
    #[must_use]
    pub fn extension_key(&self) -> &str {
        self.extension.strip_prefix('.').unwrap_or(&self.extension)
    }
}
