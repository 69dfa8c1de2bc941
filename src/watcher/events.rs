//! Events produced by a poll cycle.

#![allow(clippy::missing_const_for_fn)]

use chrono::{DateTime, Utc};

use super::registry::Reconciliation;

/// A line containing the magic string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// File name within the watched directory.
    pub filename: String,
    /// 1-based line number.
    pub line_number: u64,
    /// When the match was observed.
    pub timestamp: DateTime<Utc>,
}

impl MatchEvent {
    #[must_use]
    pub fn new(filename: impl Into<String>, line_number: u64) -> Self {
        Self {
            filename: filename.into(),
            line_number,
            timestamp: Utc::now(),
        }
    }
}

/// Everything one poll cycle observed.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// The directory could not be listed; nothing else was done.
    pub directory_unavailable: bool,
    /// Files that appeared or disappeared.
    pub changes: Reconciliation,
    /// New matches, grouped by file in name order.
    pub matches: Vec<MatchEvent>,
    /// Files whose line count dropped and were rescanned from line 1.
    pub truncated: Vec<String>,
    /// Files that could not be opened this cycle.
    pub unavailable: Vec<String>,
    /// Files whose scan failed for any other reason.
    pub failed: Vec<String>,
}

impl CycleReport {
    /// Report for a cycle that stopped at the directory listing.
    #[must_use]
    pub fn directory_unavailable() -> Self {
        Self {
            directory_unavailable: true,
            ..Self::default()
        }
    }

    /// Line numbers matched in `filename`, ascending.
    #[must_use]
    pub fn lines_for(&self, filename: &str) -> Vec<u64> {
        self.matches
            .iter()
            .filter(|m| m.filename == filename)
            .map(|m| m.line_number)
            .collect()
    }

    /// Check if the cycle saw no changes, matches or problems.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        !self.directory_unavailable
            && self.changes.is_empty()
            && self.matches.is_empty()
            && self.truncated.is_empty()
            && self.unavailable.is_empty()
            && self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_event_timestamp() {
        let before = Utc::now();
        let event = MatchEvent::new("a.txt", 3);
        assert_eq!(event.filename, "a.txt");
        assert_eq!(event.line_number, 3);
        assert!(event.timestamp >= before);
    }

    #[test]
    fn test_lines_for() {
        let report = CycleReport {
            matches: vec![
                MatchEvent::new("a.txt", 1),
                MatchEvent::new("b.txt", 4),
                MatchEvent::new("a.txt", 7),
            ],
            ..CycleReport::default()
        };
        assert_eq!(report.lines_for("a.txt"), vec![1, 7]);
        assert_eq!(report.lines_for("b.txt"), vec![4]);
        assert!(report.lines_for("c.txt").is_empty());
    }

    #[test]
    fn test_quiet_report() {
        assert!(CycleReport::default().is_quiet());
        assert!(!CycleReport::directory_unavailable().is_quiet());

        let report = CycleReport {
            unavailable: vec!["a.txt".to_string()],
            ..CycleReport::default()
        };
        assert!(!report.is_quiet());
    }
}
