//! Directory polling and incremental scanning.
//!
//! This module provides:
//! - Directory listing and extension filtering
//! - The tracked-file registry with per-file line offsets
//! - The incremental line scanner
//! - The poll loop tying them together

mod events;
mod filter;
mod listing;
mod poll;
mod registry;
mod scanner;

pub use events::{CycleReport, MatchEvent};
pub use filter::FileFilter;
pub use listing::{list_directory, DirEntryInfo};
pub use poll::{PollLoop, RunState};
pub use registry::{FileRegistry, Reconciliation, TrackedFile};
pub use scanner::{LineScanner, ScanOutcome};
