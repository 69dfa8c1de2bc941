//! Incremental line scanner.
//!
//! Each scan re-opens the file and streams it from the top, skipping the lines
//! already consumed in earlier cycles. Re-reading from line 1 is what lets a
//! truncated or rotated file be detected: its line count drops below the
//! stored offset.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use crate::error::WatchError;
use crate::Result;

/// Result of scanning one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// 1-based line numbers of new matching lines, ascending.
    pub matches: Vec<u64>,
    /// Complete lines in the file; the start line for the next scan.
    pub new_offset: u64,
    /// The file had fewer lines than the start offset and was rescanned from
    /// line 1.
    pub truncated: bool,
}

/// Finds lines containing the magic string.
#[derive(Debug, Clone)]
pub struct LineScanner {
    magic: String,
}

impl LineScanner {
    /// Create a scanner for `magic`. Matching is plain, case-sensitive
    /// substring containment.
    pub fn new(magic: impl Into<String>) -> Self {
        Self {
            magic: magic.into(),
        }
    }

    /// The substring this scanner looks for.
    #[must_use]
    pub fn magic(&self) -> &str {
        &self.magic
    }

    /// Scan `path`, reporting matches at or after the 0-based line `start_line`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::FileUnavailable` if the file cannot be opened and
    /// `Error::Io` if reading fails part way through.
    pub fn scan(&self, path: &Path, start_line: u64) -> Result<ScanOutcome> {
        let file = File::open(path).map_err(|e| WatchError::file_unavailable(path, e))?;
        self.scan_reader(BufReader::new(file), start_line)
    }

    /// Scan any seekable buffered reader. See [`scan`](Self::scan).
    ///
    /// Only newline-terminated lines are consumed. A trailing partial line is
    /// neither counted nor matched, so it is read again once its writer
    /// finishes it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails.
    pub fn scan_reader<R: BufRead + Seek>(
        &self,
        mut reader: R,
        start_line: u64,
    ) -> Result<ScanOutcome> {
        let (matches, line_count) = self.read_lines(&mut reader, start_line)?;
        if line_count >= start_line {
            return Ok(ScanOutcome {
                matches,
                new_offset: line_count,
                truncated: false,
            });
        }

        // Fewer lines than already consumed: the file was truncated or
        // replaced, so read it again from line 1.
        reader.rewind()?;
        let (matches, line_count) = self.read_lines(&mut reader, 0)?;
        Ok(ScanOutcome {
            matches,
            new_offset: line_count,
            truncated: true,
        })
    }

    /// Count complete lines and collect matches on lines past `start_line`.
    fn read_lines<R: BufRead>(&self, reader: &mut R, start_line: u64) -> Result<(Vec<u64>, u64)> {
        let mut buf = Vec::new();
        let mut line_count: u64 = 0;
        let mut matches = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 || buf.last() != Some(&b'\n') {
                break;
            }
            line_count += 1;
            if line_count > start_line && self.line_matches(&buf) {
                matches.push(line_count);
            }
        }

        Ok((matches, line_count))
    }

    fn line_matches(&self, raw: &[u8]) -> bool {
        let line = raw.strip_suffix(b"\n").unwrap_or(raw);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        String::from_utf8_lossy(line).contains(self.magic.as_str())
    }
}
