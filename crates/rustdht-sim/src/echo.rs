//! Echo peer.
//!
//! A bot participant that dials a relay and answers every message it hears
//! with `echo: <body>`. Gives a single interactive session someone to talk
//! to.

use rustdht_app::{PeerModule, inbound};
use tokio::task::AbortHandle;

use crate::{SimError, SimNetwork};

const ECHO_PREFIX: &str = "echo: ";

/// Handle to a running echo peer. The peer stops when the handle is dropped.
pub struct EchoPeer {
    peer_id: String,
    abort_handle: AbortHandle,
}

impl EchoPeer {
    /// The echo peer's id.
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }
}

impl Drop for EchoPeer {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Start an echo peer on `network` connected to `address`.
///
/// Must be called within a tokio runtime.
pub async fn spawn_echo_peer(network: &SimNetwork, address: &str) -> Result<EchoPeer, SimError> {
    let mut module = network.module();
    let Some(mut inbound_rx) = module.subscribe() else {
        return Err(SimError::NotInitialized);
    };

    module.initialize().await?;
    module.start()?;
    module.connect(address)?;
    let peer_id = module.peer_id().ok_or(SimError::NotStarted)?;
    tracing::info!(%peer_id, address, "echo peer online");

    let handle = tokio::spawn(async move {
        while let Some(raw) = inbound_rx.recv().await {
            let Some(message) = inbound::decode(&raw) else {
                continue;
            };
            // Never answer another echo, two echo peers would loop forever
            if message.body.starts_with(ECHO_PREFIX) {
                continue;
            }
            if let Err(e) = module.send(&format!("{ECHO_PREFIX}{}", message.body)) {
                tracing::warn!(error = %e, "echo peer failed to reply");
            }
        }
    });

    Ok(EchoPeer { peer_id, abort_handle: handle.abort_handle() })
}
