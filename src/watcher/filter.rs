//! File filtering by extension.

use std::path::Path;

use super::listing::DirEntryInfo;

/// Decides which directory entries are scanned.
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// Extension without the leading dot.
    extension: String,
}

impl FileFilter {
    /// Create a filter for `extension`. A leading dot is optional.
    pub fn new(extension: impl AsRef<str>) -> Self {
        let extension = extension.as_ref();
        Self {
            extension: extension.strip_prefix('.').unwrap_or(extension).to_string(),
        }
    }

    /// Check if a listed entry should be tracked.
    #[must_use]
    pub fn should_watch(&self, entry: &DirEntryInfo) -> bool {
        // Must be a file
        if !entry.is_file {
            return false;
        }

        if Self::is_hidden(&entry.name) {
            return false;
        }

        self.matches_extension(Path::new(&entry.name))
    }

    /// Exact, case-sensitive comparison of the final extension.
    ///
    /// `a.txt` matches `txt`; `a.txt.bak`, `.txt` and `notes_txt` do not.
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext == self.extension)
    }

    /// Extension this filter accepts, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }
}
