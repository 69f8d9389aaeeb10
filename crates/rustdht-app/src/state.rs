//! Observable controller state types.
//!
//! [`ClientState`] is the controller's coarse lifecycle view and
//! [`SessionView`] is the read-only snapshot handed to the host for rendering.

use std::fmt;

use crate::{ConversationLog, Transcript};

/// Lifecycle state of the client.
///
/// Transitions only move forward: `Unloaded → Loading → Ready → Started →
/// Connected`. The single way back is a restart, which discards the whole
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClientState {
    /// Module not initialized.
    Unloaded,
    /// Module initialization in flight.
    Loading,
    /// Module callable, client not yet started.
    Ready,
    /// Local participant armed.
    Started,
    /// A connect request was accepted for dispatch.
    ///
    /// Advisory only: no live connection is verified.
    Connected,
}

impl ClientState {
    /// Whether the client may connect or send messages.
    pub fn is_started(self) -> bool {
        matches!(self, Self::Started | Self::Connected)
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Started => "started",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Peer identifier recorded on locally sent conversation entries.
    pub local_peer: String,
    /// Maximum transcript length. `None` keeps every entry.
    pub transcript_limit: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { local_peer: "you".to_string(), transcript_limit: None }
    }
}

/// Borrowed snapshot of everything the host may render.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// Current lifecycle state.
    pub state: ClientState,
    /// Operational transcript.
    pub transcript: &'a Transcript,
    /// Sent and received chat entries.
    pub conversation: &'a ConversationLog,
    /// Pending, unsent input.
    pub draft: &'a str,
}
