//! Host-triggerable commands.
//!
//! This module defines [`HostCommand`], the set of user actions the host
//! forwards to the [`crate::Runtime`], together with the line syntax used by
//! text frontends.

/// User actions exposed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Arm the local participant.
    Start,

    /// Discard the session and reload from scratch.
    Restart,

    /// Connect to a peer or relay.
    Connect {
        /// Address as typed by the user. Validated by the controller.
        address: String,
    },

    /// Send a chat message.
    Send {
        /// Message body.
        body: String,
    },

    /// Empty the transcript.
    ClearTranscript,

    /// Stop the runtime.
    Quit,
}

impl HostCommand {
    /// Parse a line of user input.
    ///
    /// Lines starting with `/` are commands; anything else is a message.
    /// Blank lines and unknown commands yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(cmd) = line.strip_prefix('/') else {
            return Some(Self::Send { body: line.to_string() });
        };

        let (name, rest) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
        match name {
            "start" => Some(Self::Start),
            "restart" => Some(Self::Restart),
            "connect" => Some(Self::Connect { address: rest.trim().to_string() }),
            "clear" => Some(Self::ClearTranscript),
            "quit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}
