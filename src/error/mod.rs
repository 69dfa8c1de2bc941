//! Error types and Result aliases for magicwatch.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using magicwatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for magicwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory watching or file scanning error.
    #[error("watcher error: {0}")]
    Watch(#[from] WatchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the poll cycle and its collaborators.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The watched directory is missing or unreadable.
    #[error("directory '{}' is unavailable: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tracked file vanished or became unreadable before it could be scanned.
    #[error("file '{}' is unavailable: {source}", path.display())]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lookup of a name the registry does not track.
    #[error("file '{0}' is not tracked")]
    NotTracked(String),

    /// Attempt to move a tracked offset backwards.
    #[error("offset for '{name}' cannot move from {current} back to {requested}")]
    OffsetRegression {
        name: String,
        current: u64,
        requested: u64,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl WatchError {
    /// Create a directory-unavailable error.
    pub fn directory_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a file-unavailable error.
    pub fn file_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileUnavailable {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests;
