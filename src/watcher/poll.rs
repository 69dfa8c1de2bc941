//! The poll loop: list, reconcile, scan, sleep, repeat.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::events::{CycleReport, MatchEvent};
use super::filter::FileFilter;
use super::listing::list_directory;
use super::registry::FileRegistry;
use super::scanner::LineScanner;
use crate::config::Config;
use crate::error::WatchError;
use crate::{Error, Result};

/// Process-wide run flag plus the start time used for uptime reporting.
///
/// Clones share the same flag. The flag only ever goes from running to
/// stopped.
#[derive(Debug, Clone)]
pub struct RunState {
    token: CancellationToken,
    started: Instant,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            started: Instant::now(),
        }
    }

    /// Request a stop. Takes effect at the top of the next cycle.
    pub fn stop(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Token cancelled when a stop is requested.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Time elapsed since the state was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

struct FileScan {
    matches: Vec<MatchEvent>,
    truncated: bool,
}

/// Drives the watcher. Owns every piece of mutable state it touches.
#[derive(Debug)]
pub struct PollLoop {
    dir: PathBuf,
    interval: Duration,
    filter: FileFilter,
    scanner: LineScanner,
    registry: FileRegistry,
    run_state: RunState,
}

impl PollLoop {
    /// Create a poll loop from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid.
    pub fn new(config: &Config, run_state: RunState) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            dir: config.watch_dir.clone(),
            interval: config.interval()?,
            filter: FileFilter::new(&config.extension),
            scanner: LineScanner::new(config.magic.clone()),
            registry: FileRegistry::new(),
            run_state,
        })
    }

    /// Run cycles until the run state is stopped.
    ///
    /// A stop request is honored between cycles: the in-flight cycle always
    /// completes, and a pending sleep is cut short.
    ///
    /// # Errors
    ///
    /// Cycle failures are logged and never returned; this only returns `Ok`.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(
            dir = %self.dir.display(),
            ext = %self.filter.extension(),
            magic = %self.scanner.magic(),
            "Watching directory {} for files ending with .{} containing magic string {:?}",
            self.dir.display(),
            self.filter.extension(),
            self.scanner.magic()
        );

        let token = self.run_state.token();

        while self.run_state.is_running() {
            let report = self.cycle();
            if !report.is_quiet() {
                tracing::debug!(
                    added = report.changes.added.len(),
                    removed = report.changes.removed.len(),
                    matches = report.matches.len(),
                    truncated = report.truncated.len(),
                    unavailable = report.unavailable.len(),
                    failed = report.failed.len(),
                    tracked = self.registry.len(),
                    "Cycle complete"
                );
            }

            if !self.run_state.is_running() {
                break;
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                () = token.cancelled() => {}
            }

            let uptime = self.run_state.uptime().as_secs_f64();
            tracing::info!(uptime_secs = uptime, "Program uptime: {uptime:.1} seconds");
        }

        tracing::info!(dir = %self.dir.display(), "Stopped watching directory");
        Ok(())
    }

    /// Run a single poll cycle.
    ///
    /// Never fails: a missing directory skips the cycle, and per-file problems
    /// skip that file. Each problem is logged once.
    pub fn cycle(&mut self) -> CycleReport {
        let listing = match list_directory(&self.dir) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Directory {} is unavailable",
                    self.dir.display()
                );
                return CycleReport::directory_unavailable();
            }
        };

        let current: BTreeSet<String> = listing
            .into_iter()
            .filter(|entry| self.filter.should_watch(entry))
            .map(|entry| entry.name)
            .collect();

        let changes = self.registry.reconcile(&current);
        for name in &changes.added {
            tracing::info!(file = %name, "New file found: {name}");
        }
        for name in &changes.removed {
            tracing::info!(file = %name, "File deleted: {name}");
        }

        let mut report = CycleReport {
            changes,
            ..CycleReport::default()
        };

        for name in self.registry.names() {
            match self.scan_tracked(&name) {
                Ok(scan) => {
                    if scan.truncated {
                        report.truncated.push(name);
                    }
                    report.matches.extend(scan.matches);
                }
                Err(Error::Watch(e @ WatchError::FileUnavailable { .. })) => {
                    tracing::warn!(file = %name, error = %e, "Skipping {name} this cycle");
                    report.unavailable.push(name);
                }
                Err(e) => {
                    tracing::error!(
                        file = %name,
                        dir = %self.dir.display(),
                        error = %e,
                        details = ?e,
                        "Failed to scan {name}"
                    );
                    report.failed.push(name);
                }
            }
        }

        report
    }

    fn scan_tracked(&mut self, name: &str) -> Result<FileScan> {
        let start = self.registry.offset_of(name)?;
        let outcome = self.scanner.scan(&self.dir.join(name), start)?;

        if outcome.truncated {
            tracing::warn!(
                file = %name,
                previous_lines = start,
                current_lines = outcome.new_offset,
                "File truncated: {name}, rescanning from line 1"
            );
            self.registry.reset_offset(name)?;
        }

        let matches: Vec<MatchEvent> = outcome
            .matches
            .iter()
            .map(|&line| MatchEvent::new(name, line))
            .collect();

        for event in &matches {
            tracing::info!(
                file = %event.filename,
                line = event.line_number,
                at = %event.timestamp.to_rfc3339(),
                "Match found for {:?} on line {} in {}",
                self.scanner.magic(),
                event.line_number,
                event.filename
            );
        }

        self.registry.set_offset(name, outcome.new_offset)?;

        Ok(FileScan {
            matches,
            truncated: outcome.truncated,
        })
    }

    /// Sleep between cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tracked files and their offsets.
    #[must_use]
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }
}
