//! Best-times leaderboard
//!
//! Kept in memory for the lifetime of the process and carried across
//! restarts. Runs only end when the egg dies, so the longest survival
//! ranks first.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_ENTRIES: usize = 3;

/// Shown for empty leaderboard slots
pub const PLACEHOLDER: &str = "--:--";

/// Format a duration in milliseconds as `MM:SS`
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Top survival times, longest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    /// Run durations in milliseconds, sorted descending
    entries: Vec<u64>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run time would make the board
    pub fn qualifies(&self, elapsed_ms: u64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|&e| elapsed_ms > e).unwrap_or(true)
    }

    /// Record a finished run.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_time(&mut self, elapsed_ms: u64) -> Option<usize> {
        if !self.qualifies(elapsed_ms) {
            return None;
        }

        // Find insertion point (sorted descending by time)
        let pos = self.entries.iter().position(|&e| elapsed_ms > e);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, elapsed_ms);
                i + 1
            }
            None => {
                self.entries.push(elapsed_ms);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Owned variant of [`Leaderboard::add_time`] for whole-value updates
    pub fn with_time(mut self, elapsed_ms: u64) -> Self {
        if let Some(rank) = self.add_time(elapsed_ms) {
            log::info!("Run of {} placed #{} on the leaderboard", format_time(elapsed_ms), rank);
        }
        self
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest recorded run (if any)
    pub fn best(&self) -> Option<u64> {
        self.entries.first().copied()
    }

    /// Entries as `MM:SS` strings, best first
    pub fn formatted(&self) -> Vec<String> {
        self.entries.iter().map(|&ms| format_time(ms)).collect()
    }

    /// Exactly [`MAX_ENTRIES`] display rows, padding missing slots
    pub fn padded(&self) -> Vec<String> {
        let mut rows = self.formatted();
        rows.resize(MAX_ENTRIES, PLACEHOLDER.to_string());
        rows
    }
}
