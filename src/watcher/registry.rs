//! In-memory registry of tracked files and their scan offsets.
//!
//! The registry is pure: it never touches the filesystem and never logs. The
//! poll loop turns the [`Reconciliation`] it returns into lifecycle log lines.

use std::collections::{BTreeSet, HashMap};

use crate::error::WatchError;

/// A file the registry is tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// File name, unique within the registry.
    pub name: String,
    /// Number of lines already scanned.
    pub last_offset: u64,
}

impl TrackedFile {
    fn new(name: String) -> Self {
        Self {
            name,
            last_offset: 0,
        }
    }
}

/// Outcome of diffing a directory listing against the registry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Names that were not tracked before, sorted.
    pub added: Vec<String>,
    /// Names that are no longer present, sorted.
    pub removed: Vec<String>,
}

impl Reconciliation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Mapping of file name to scan state.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: HashMap<String, TrackedFile>,
}

impl FileRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the registry in line with `current`.
    ///
    /// Untracked names start at offset 0; tracked names missing from `current`
    /// are dropped. Everything else keeps its offset.
    pub fn reconcile(&mut self, current: &BTreeSet<String>) -> Reconciliation {
        let mut removed: Vec<String> = self
            .files
            .keys()
            .filter(|name| !current.contains(*name))
            .cloned()
            .collect();
        removed.sort();
        for name in &removed {
            self.files.remove(name);
        }

        let mut added = Vec::new();
        for name in current {
            if !self.files.contains_key(name) {
                self.files
                    .insert(name.clone(), TrackedFile::new(name.clone()));
                added.push(name.clone());
            }
        }

        Reconciliation { added, removed }
    }

    /// Lines already scanned for `name`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::NotTracked` if `name` is not in the registry.
    pub fn offset_of(&self, name: &str) -> Result<u64, WatchError> {
        self.files
            .get(name)
            .map(|f| f.last_offset)
            .ok_or_else(|| WatchError::NotTracked(name.to_string()))
    }

    /// Advance the offset of `name` to `new_offset`.
    ///
    /// Offsets never move backwards; use [`reset_offset`](Self::reset_offset)
    /// when a file has been truncated.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::NotTracked` for unknown names and
    /// `WatchError::OffsetRegression` if `new_offset` is below the current one.
    pub fn set_offset(&mut self, name: &str, new_offset: u64) -> Result<(), WatchError> {
        let file = self
            .files
            .get_mut(name)
            .ok_or_else(|| WatchError::NotTracked(name.to_string()))?;

        debug_assert!(
            new_offset >= file.last_offset,
            "offset for {name} moved backwards: {} -> {new_offset}",
            file.last_offset
        );
        if new_offset < file.last_offset {
            return Err(WatchError::OffsetRegression {
                name: name.to_string(),
                current: file.last_offset,
                requested: new_offset,
            });
        }

        file.last_offset = new_offset;
        Ok(())
    }

    /// Treat `name` as rediscovered: its offset goes back to 0.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::NotTracked` if `name` is not in the registry.
    pub fn reset_offset(&mut self, name: &str) -> Result<(), WatchError> {
        let file = self
            .files
            .get_mut(name)
            .ok_or_else(|| WatchError::NotTracked(name.to_string()))?;
        file.last_offset = 0;
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Tracked names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_reconcile_adds_new_files_at_zero() {
        let mut registry = FileRegistry::new();
        let delta = registry.reconcile(&set(&["b.txt", "a.txt"]));

        assert_eq!(delta.added, vec!["a.txt", "b.txt"]);
        assert!(delta.removed.is_empty());
        assert_eq!(registry.offset_of("a.txt").unwrap(), 0);
        assert_eq!(registry.offset_of("b.txt").unwrap(), 0);
    }

    #[test]
    fn test_reconcile_removes_missing_files() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt", "b.txt"]));

        let delta = registry.reconcile(&set(&["a.txt"]));
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed, vec!["b.txt"]);
        assert!(!registry.contains("b.txt"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reconcile_keeps_existing_offsets() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));
        registry.set_offset("a.txt", 7).unwrap();

        let delta = registry.reconcile(&set(&["a.txt", "c.txt"]));
        assert_eq!(delta.added, vec!["c.txt"]);
        assert_eq!(registry.offset_of("a.txt").unwrap(), 7);
    }

    #[test]
    fn test_reconcile_unchanged_listing_is_empty() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));
        assert!(registry.reconcile(&set(&["a.txt"])).is_empty());
    }

    #[test]
    fn test_rediscovered_file_starts_over() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));
        registry.set_offset("a.txt", 12).unwrap();

        registry.reconcile(&set(&[]));
        let delta = registry.reconcile(&set(&["a.txt"]));

        assert_eq!(delta.added, vec!["a.txt"]);
        assert_eq!(registry.offset_of("a.txt").unwrap(), 0);
    }

    #[test]
    fn test_offset_of_untracked() {
        let registry = FileRegistry::new();
        let err = registry.offset_of("ghost.txt").unwrap_err();
        assert!(matches!(err, WatchError::NotTracked(name) if name == "ghost.txt"));
    }

    #[test]
    fn test_set_offset_advances() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));

        registry.set_offset("a.txt", 3).unwrap();
        registry.set_offset("a.txt", 3).unwrap();
        registry.set_offset("a.txt", 9).unwrap();
        assert_eq!(registry.offset_of("a.txt").unwrap(), 9);
    }

    #[test]
    fn test_set_offset_untracked() {
        let mut registry = FileRegistry::new();
        assert!(matches!(
            registry.set_offset("ghost.txt", 1),
            Err(WatchError::NotTracked(_))
        ));
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_set_offset_rejects_regression() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));
        registry.set_offset("a.txt", 5).unwrap();

        let err = registry.set_offset("a.txt", 2).unwrap_err();
        assert!(matches!(
            err,
            WatchError::OffsetRegression {
                current: 5,
                requested: 2,
                ..
            }
        ));
        assert_eq!(registry.offset_of("a.txt").unwrap(), 5);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "moved backwards")]
    fn test_set_offset_regression_panics_in_debug() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));
        registry.set_offset("a.txt", 5).unwrap();
        let _ = registry.set_offset("a.txt", 2);
    }

    #[test]
    fn test_reset_offset() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["a.txt"]));
        registry.set_offset("a.txt", 5).unwrap();

        registry.reset_offset("a.txt").unwrap();
        assert_eq!(registry.offset_of("a.txt").unwrap(), 0);
        registry.set_offset("a.txt", 2).unwrap();
        assert_eq!(registry.offset_of("a.txt").unwrap(), 2);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = FileRegistry::new();
        registry.reconcile(&set(&["c.txt", "a.txt", "b.txt"]));
        assert_eq!(registry.names(), vec!["a.txt", "b.txt", "c.txt"]);
        assert!(!registry.is_empty());
    }
}
