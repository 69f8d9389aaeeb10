//! External peer module seam.
//!
//! The [`PeerModule`] trait is the narrow surface through which the
//! controller drives the opaque peer-to-peer module: four calls and one
//! inbound notification channel. Everything behind it (transport, discovery,
//! cryptography) belongs to the implementation.

use std::future::Future;

use tokio::sync::mpsc;

/// Receiving half of the inbound notification channel.
///
/// Each item is an encoded `peer:body` payload, uncorrelated with any prior
/// call.
pub type InboundReceiver = mpsc::UnboundedReceiver<String>;

/// Sending half of the inbound notification channel, held by the module.
pub type InboundSender = mpsc::UnboundedSender<String>;

/// Create an inbound notification channel.
pub fn inbound_channel() -> (InboundSender, InboundReceiver) {
    mpsc::unbounded_channel()
}

/// External peer-to-peer module consumed by the controller.
///
/// Methods take `&self` so the loader and the controller can share one
/// instance; implementations own their interior state.
///
/// # Implementations
///
/// - **In-process**: `rustdht_sim::SimModule`, an in-memory gossip network
/// - **Tests**: `rustdht_sim::ScriptedModule`, records calls and injects
///   failures
pub trait PeerModule: Send + Sync + 'static {
    /// Opaque module error. Only its `Display` text reaches the transcript.
    type Error: std::error::Error + Send + Sync + 'static;

    /// One-time asynchronous initialization. Resolves once the module is
    /// callable.
    fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Arm the local participant.
    fn start(&self) -> Result<(), Self::Error>;

    /// Request a connection attempt to `address`.
    ///
    /// `Ok` means the request was accepted for dispatch, not that a peer
    /// connection was established.
    fn connect(&self, address: &str) -> Result<(), Self::Error>;

    /// Request transmission of `body`. Accepted or rejected synchronously.
    fn send(&self, body: &str) -> Result<(), Self::Error>;

    /// Take the inbound notification channel.
    ///
    /// Returns `Some` on the first call and `None` afterwards.
    fn subscribe(&mut self) -> Option<InboundReceiver>;
}
