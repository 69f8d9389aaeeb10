//! Operational transcript sink.
//!
//! Append-only log of controller actions and their outcomes, meant for human
//! diagnosis. Entries carry a sequence number that keeps increasing across
//! [`Transcript::clear`] so a viewport can reveal exactly the entries it has
//! not shown yet.

use std::{collections::VecDeque, fmt};

use chrono::{DateTime, FixedOffset};

/// A single timestamped transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Append sequence number, unique within one transcript.
    pub seq: u64,
    /// Wall-clock time of the append, in the offset the host displays.
    pub timestamp: DateTime<FixedOffset>,
    /// Human-readable text.
    pub text: String,
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.text)
    }
}

/// Append-only transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: VecDeque<TranscriptEntry>,
    next_seq: u64,
    limit: Option<usize>,
}

impl Transcript {
    /// Create an unbounded transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript that keeps at most `limit` entries, dropping the
    /// oldest on overflow. `None` keeps every entry.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self { limit, ..Self::default() }
    }

    /// Append a line. Always succeeds; the entry becomes the most recent one.
    pub fn append(
        &mut self,
        timestamp: DateTime<FixedOffset>,
        text: impl Into<String>,
    ) -> &TranscriptEntry {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(TranscriptEntry { seq, timestamp, text: text.into() });

        if let Some(limit) = self.limit {
            while self.entries.len() > limit.max(1) {
                self.entries.pop_front();
            }
        }

        // Non-empty: pushed above and the limit keeps at least one entry.
        &self.entries[self.entries.len() - 1]
    }

    /// Remove every entry. Sequence numbers are not reused.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in append order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &TranscriptEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Entries appended after sequence number `seq`.
    pub fn since(&self, seq: Option<u64>) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().filter(move |e| seq.is_none_or(|s| e.seq > s))
    }

    /// Most recent entry. `None` if empty.
    pub fn latest(&self) -> Option<&TranscriptEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any retained entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.text.contains(needle))
    }
}
