//! Line reconstruction — re-joins continuation lines into logical entries.
//!
//! A raw line starts a new entry when it begins with a timestamp of the form
//! `DD/DD/DDDD DD:DD:DD.DDD`. Every other non-blank line is trimmed of spaces
//! and appended to the most recent entry with a single space separator.
//!
//! Continuation lines seen before the first start line have nothing to
//! attach to. They are dropped and counted in [`Reconstruction::orphans`] so
//! the caller can warn about them.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::LogicalEntry;

// Any single character may separate seconds from milliseconds.
static RECORD_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2}.[0-9]{3}")
        .expect("record-start pattern is valid")
});

/// Whether `line` opens a new logical entry.
pub fn is_record_start(line: &str) -> bool {
    RECORD_START.is_match(line)
}

/// Blank lines (nothing but spaces, tabs and newlines) neither start nor
/// extend an entry.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| matches!(c, ' ' | '\t' | '\n'))
}

/// Result of reconstructing one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Entries in file order.
    pub entries: Vec<LogicalEntry>,
    /// Continuation lines dropped because no start line preceded them.
    pub orphans: usize,
}

/// Incremental reconstructor fed one raw line at a time.
#[derive(Debug, Default)]
pub struct Reconstructor {
    out: Reconstruction,
}

impl Reconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) {
        if is_blank(line) {
            return;
        }

        if is_record_start(line) {
            self.out.entries.push(line.to_string());
            return;
        }

        match self.out.entries.last_mut() {
            Some(entry) => {
                entry.push(' ');
                entry.push_str(line.trim_matches(' '));
            }
            None => self.out.orphans += 1,
        }
    }

    pub fn finish(self) -> Reconstruction {
        self.out
    }
}

/// Reconstruct a complete, in-memory sequence of lines.
pub fn reconstruct<'a, I>(lines: I) -> Reconstruction
where
    I: IntoIterator<Item = &'a str>,
{
    let mut reconstructor = Reconstructor::new();
    for line in lines {
        reconstructor.push(line);
    }
    reconstructor.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
