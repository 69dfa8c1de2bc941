//! Directory listing for the poll cycle.

use std::fs;
use std::path::Path;

use crate::error::WatchError;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name relative to the watched directory.
    pub name: String,
    /// Whether the entry resolves to a regular file (symlinks are followed).
    pub is_file: bool,
}

impl DirEntryInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, is_file: bool) -> Self {
        Self {
            name: name.into(),
            is_file,
        }
    }
}

/// List the immediate entries of `dir`.
///
/// Entries whose names are not valid UTF-8 are skipped, as are entries that
/// vanish while being listed. Subdirectories are reported with
/// `is_file == false`; nothing is listed recursively.
///
/// # Errors
///
/// Returns `WatchError::DirectoryUnavailable` if `dir` is missing or unreadable.
pub fn list_directory(dir: &Path) -> Result<Vec<DirEntryInfo>, WatchError> {
    let entries =
        fs::read_dir(dir).map_err(|e| WatchError::directory_unavailable(dir, e))?;

    let mut listing = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(dir = %dir.display(), "Skipping entry with non UTF-8 name");
            continue;
        };

        // metadata() follows symlinks; a dangling link is not a file
        let is_file = fs::metadata(entry.path()).is_ok_and(|m| m.is_file());
        listing.push(DirEntryInfo { name, is_file });
    }

    Ok(listing)
}
