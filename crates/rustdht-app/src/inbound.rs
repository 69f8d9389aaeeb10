//! Inbound notification decoding.
//!
//! The peer module delivers every remote message as a single `peer:body`
//! string. Only the first delimiter separates the two parts, so bodies may
//! contain the delimiter freely.

/// Separator between peer identifier and body.
pub const DELIMITER: char = ':';

/// A decoded inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Identifier of the remote peer.
    pub peer: String,
    /// Message body, delimiter characters preserved.
    pub body: String,
}

/// Decode a raw inbound payload. `None` if the payload has no delimiter.
pub fn decode(raw: &str) -> Option<InboundMessage> {
    raw.split_once(DELIMITER)
        .map(|(peer, body)| InboundMessage { peer: peer.to_string(), body: body.to_string() })
}

/// Encode a message the way the peer module delivers it.
pub fn encode(peer: &str, body: &str) -> String {
    format!("{peer}{DELIMITER}{body}")
}
