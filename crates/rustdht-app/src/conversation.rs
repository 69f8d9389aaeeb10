//! Conversation log sink.

use std::fmt;

/// Direction of a chat entry relative to the local user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the local user.
    Sent,
    /// Received from a remote peer.
    Received,
}

/// A chat entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    /// Append sequence number, unique within one log.
    pub seq: u64,
    /// Peer the entry is attributed to.
    pub peer: String,
    /// Message body.
    pub body: String,
    /// Sent or received.
    pub direction: Direction,
}

impl fmt::Display for ConversationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            Direction::Sent => "->",
            Direction::Received => "<-",
        };
        write!(f, "{arrow} {}: {}", self.peer, self.body)
    }
}

/// Append-only conversation log, ordered by append time.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    next_seq: u64,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Always succeeds.
    pub fn append(
        &mut self,
        peer: impl Into<String>,
        body: impl Into<String>,
        direction: Direction,
    ) -> &ConversationEntry {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(ConversationEntry { seq, peer: peer.into(), body: body.into(), direction });
        &self.entries[self.entries.len() - 1]
    }

    /// Remove every entry. Sequence numbers are not reused.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Entries appended after sequence number `seq`.
    pub fn since(&self, seq: Option<u64>) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter().filter(move |e| seq.is_none_or(|s| e.seq > s))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_direction_and_order() {
        let mut log = ConversationLog::new();
        log.append("you", "ping", Direction::Sent);
        log.append("peer42", "pong", Direction::Received);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].direction, Direction::Sent);
        assert_eq!(log.entries()[1].peer, "peer42");
        assert!(log.entries()[0].seq < log.entries()[1].seq);
    }

    #[test]
    fn display_marks_direction() {
        let mut log = ConversationLog::new();
        let sent = log.append("you", "hi", Direction::Sent).to_string();
        let received = log.append("abc", "yo", Direction::Received).to_string();
        assert_eq!(sent, "-> you: hi");
        assert_eq!(received, "<- abc: yo");
    }
}
