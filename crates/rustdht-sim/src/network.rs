//! In-memory gossip network.
//!
//! [`SimNetwork`] is a registry of nodes linked by bidirectional connections.
//! Publishing floods a message over links to every reachable node, the way a
//! single gossip topic would, and delivers `author:body` to each reached
//! node's inbound channel. Relay nodes forward but have no inbound channel.
//!
//! All state sits behind one synchronous lock that is never held across an
//! await point.

use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustdht_app::{InboundReceiver, InboundSender, PeerModule, inbound, inbound_channel};
use thiserror::Error;

const PEER_ID_PREFIX: &str = "12D3KooW";
const PEER_ID_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const PEER_ID_SUFFIX_LEN: usize = 16;

/// Simulated module errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Address is neither a socket address nor a multiaddr.
    #[error("failed to parse address '{0}'")]
    InvalidAddress(String),

    /// Another node already listens on the address.
    #[error("address already in use: {0}")]
    AddressInUse(String),

    /// Operation requires `initialize` first.
    #[error("module not initialized")]
    NotInitialized,

    /// Operation requires `start` first.
    #[error("client not initialized. Please start the client first")]
    NotStarted,

    /// `start` called twice.
    #[error("client already started")]
    AlreadyStarted,
}

/// A node on the network.
struct Node {
    address: String,
    links: BTreeSet<String>,
    /// `None` for relays.
    inbound: Option<InboundSender>,
}

struct NetworkState {
    rng: ChaCha8Rng,
    nodes: HashMap<String, Node>,
    /// Listen address to peer id.
    listeners: HashMap<String, String>,
    next_memory_port: u64,
}

impl NetworkState {
    fn fresh_peer_id(&mut self) -> String {
        loop {
            let suffix: String = (0..PEER_ID_SUFFIX_LEN)
                .map(|_| PEER_ID_ALPHABET[self.rng.gen_range(0..PEER_ID_ALPHABET.len())] as char)
                .collect();
            let id = format!("{PEER_ID_PREFIX}{suffix}");
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert(&mut self, address: String, inbound: Option<InboundSender>) -> String {
        let peer_id = self.fresh_peer_id();
        self.listeners.insert(address.clone(), peer_id.clone());
        self.nodes.insert(peer_id.clone(), Node { address, links: BTreeSet::new(), inbound });
        peer_id
    }
}

/// Shared in-memory network. Clones refer to the same network.
#[derive(Clone)]
pub struct SimNetwork {
    inner: Arc<Mutex<NetworkState>>,
}

impl SimNetwork {
    /// Create an empty network whose peer ids derive from `seed`.
    pub fn new(seed: u64) -> Self {
        let state = NetworkState {
            rng: ChaCha8Rng::seed_from_u64(seed),
            nodes: HashMap::new(),
            listeners: HashMap::new(),
            next_memory_port: 1,
        };
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    fn lock(&self) -> MutexGuard<'_, NetworkState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a relay listening on `address`. Returns its peer id.
    pub fn spawn_relay(&self, address: &str) -> Result<String, SimError> {
        validate_address(address)?;

        let mut state = self.lock();
        if state.listeners.contains_key(address) {
            return Err(SimError::AddressInUse(address.to_string()));
        }
        let peer_id = state.insert(address.to_string(), None);
        tracing::info!(%peer_id, address, "relay listening");
        Ok(peer_id)
    }

    /// Build a module attached to this network.
    pub fn module(&self) -> SimModule {
        SimModule::new(self.clone(), SimModuleConfig::default())
    }

    /// Build a module attached to this network with `config`.
    pub fn module_with(&self, config: SimModuleConfig) -> SimModule {
        SimModule::new(self.clone(), config)
    }

    /// Number of registered nodes, relays included.
    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Peers directly linked to `peer_id`, sorted.
    pub fn links(&self, peer_id: &str) -> Vec<String> {
        self.lock()
            .nodes
            .get(peer_id)
            .map(|n| n.links.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Listen address of `peer_id`.
    pub fn address_of(&self, peer_id: &str) -> Option<String> {
        self.lock().nodes.get(peer_id).map(|n| n.address.clone())
    }

    fn join(&self, inbound: InboundSender) -> (String, String) {
        let mut state = self.lock();
        let address = loop {
            let candidate = format!("/memory/{}", state.next_memory_port);
            state.next_memory_port += 1;
            // Relays may have claimed a memory address explicitly
            if !state.listeners.contains_key(&candidate) {
                break candidate;
            }
        };
        let peer_id = state.insert(address.clone(), Some(inbound));
        (peer_id, address)
    }

    fn leave(&self, peer_id: &str) {
        let mut state = self.lock();
        let Some(node) = state.nodes.remove(peer_id) else {
            return;
        };
        state.listeners.remove(&node.address);
        for link in &node.links {
            if let Some(other) = state.nodes.get_mut(link) {
                other.links.remove(peer_id);
            }
        }
    }

    /// Link `from` to whoever listens on `address`. Returns the remote peer,
    /// or `None` when nobody listens there.
    fn dial(&self, from: &str, address: &str) -> Option<String> {
        let mut state = self.lock();
        let remote = state.listeners.get(address).cloned()?;
        if remote == from {
            return None;
        }
        if let Some(node) = state.nodes.get_mut(from) {
            node.links.insert(remote.clone());
        }
        if let Some(node) = state.nodes.get_mut(&remote) {
            node.links.insert(from.to_string());
        }
        Some(remote)
    }

    /// Flood `body` from `author`. Returns the number of inbound deliveries.
    fn publish(&self, author: &str, body: &str) -> usize {
        let state = self.lock();
        let payload = inbound::encode(author, body);

        let mut seen = BTreeSet::from([author.to_string()]);
        let mut queue = VecDeque::from([author.to_string()]);
        let mut delivered = 0;

        while let Some(current) = queue.pop_front() {
            let Some(node) = state.nodes.get(&current) else {
                continue;
            };
            for link in &node.links {
                if !seen.insert(link.clone()) {
                    continue;
                }
                queue.push_back(link.clone());

                let target = state.nodes.get(link).and_then(|n| n.inbound.as_ref());
                if let Some(tx) = target {
                    if tx.send(payload.clone()).is_ok() {
                        delivered += 1;
                    } else {
                        tracing::debug!(peer = %link, "inbound channel closed, skipping");
                    }
                }
            }
        }

        delivered
    }
}

/// Accept socket addresses (`192.0.2.1:9000`) and multiaddrs with at least
/// two components (`/ip4/192.0.2.1/udp/9000/webrtc-direct`, `/memory/1`).
fn validate_address(address: &str) -> Result<(), SimError> {
    let is_socket = address.parse::<SocketAddr>().is_ok();
    let is_multiaddr = address.starts_with('/')
        && address.split('/').filter(|part| !part.is_empty()).count() >= 2
        && !address.contains(char::is_whitespace);

    if is_socket || is_multiaddr {
        Ok(())
    } else {
        Err(SimError::InvalidAddress(address.to_string()))
    }
}

/// Simulated module configuration.
#[derive(Debug, Clone, Default)]
pub struct SimModuleConfig {
    /// Time `initialize` takes before resolving.
    pub init_delay: Duration,
}

#[derive(Default)]
struct ModuleState {
    initialized: bool,
    peer_id: Option<String>,
}

/// Peer module backed by a [`SimNetwork`].
pub struct SimModule {
    network: SimNetwork,
    config: SimModuleConfig,
    state: Mutex<ModuleState>,
    inbound_tx: InboundSender,
    inbound_rx: Option<InboundReceiver>,
}

impl SimModule {
    /// Create a module attached to `network`.
    pub fn new(network: SimNetwork, config: SimModuleConfig) -> Self {
        let (inbound_tx, inbound_rx) = inbound_channel();
        Self {
            network,
            config,
            state: Mutex::new(ModuleState::default()),
            inbound_tx,
            inbound_rx: Some(inbound_rx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModuleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local peer id. `None` until started.
    pub fn peer_id(&self) -> Option<String> {
        self.lock().peer_id.clone()
    }

    /// Listen address. `None` until started.
    pub fn listen_address(&self) -> Option<String> {
        self.peer_id().and_then(|id| self.network.address_of(&id))
    }

    fn started_peer(&self) -> Result<String, SimError> {
        self.lock().peer_id.clone().ok_or(SimError::NotStarted)
    }
}

impl PeerModule for SimModule {
    type Error = SimError;

    async fn initialize(&self) -> Result<(), SimError> {
        if !self.config.init_delay.is_zero() {
            tokio::time::sleep(self.config.init_delay).await;
        }
        self.lock().initialized = true;
        Ok(())
    }

    fn start(&self) -> Result<(), SimError> {
        let mut state = self.lock();
        if !state.initialized {
            return Err(SimError::NotInitialized);
        }
        if state.peer_id.is_some() {
            return Err(SimError::AlreadyStarted);
        }

        let (peer_id, address) = self.network.join(self.inbound_tx.clone());
        tracing::info!(%peer_id, %address, "local peer started");
        state.peer_id = Some(peer_id);
        Ok(())
    }

    fn connect(&self, address: &str) -> Result<(), SimError> {
        validate_address(address)?;
        let peer_id = self.started_peer()?;

        tracing::debug!(address, "dialing");
        match self.network.dial(&peer_id, address) {
            Some(remote) => tracing::info!(%remote, address, "connected"),
            // Dial failures surface only in logs, like an asynchronous
            // transport error would.
            None => tracing::warn!(address, "outgoing connection error: no listener"),
        }
        Ok(())
    }

    fn send(&self, body: &str) -> Result<(), SimError> {
        let peer_id = self.started_peer()?;
        let delivered = self.network.publish(&peer_id, body);
        tracing::debug!(delivered, "message published");
        Ok(())
    }

    fn subscribe(&mut self) -> Option<InboundReceiver> {
        self.inbound_rx.take()
    }
}

impl Drop for SimModule {
    fn drop(&mut self) {
        let peer_id = self.lock().peer_id.take();
        if let Some(peer_id) = peer_id {
            self.network.leave(&peer_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn started(network: &SimNetwork) -> (SimModule, InboundReceiver) {
        let mut module = network.module();
        let rx = module.subscribe().unwrap();
        module.initialize().await.unwrap();
        module.start().unwrap();
        (module, rx)
    }

    #[test]
    fn address_validation() {
        assert!(validate_address("192.0.2.1:9000").is_ok());
        assert!(validate_address("/ip4/192.0.2.1/udp/9000/webrtc-direct").is_ok());
        assert!(validate_address("/memory/3").is_ok());
        assert!(validate_address("localhost").is_err());
        assert!(validate_address("/ip4").is_err());
        assert!(validate_address("/ip4/1.2.3.4 /tcp/1").is_err());
    }

    #[test]
    fn seeded_peer_ids_are_deterministic() {
        let a = SimNetwork::new(7).spawn_relay("/memory/900").unwrap();
        let b = SimNetwork::new(7).spawn_relay("/memory/900").unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(PEER_ID_PREFIX));
    }

    #[test]
    fn relay_address_conflict() {
        let network = SimNetwork::new(1);
        network.spawn_relay("192.0.2.1:9000").unwrap();
        assert_eq!(
            network.spawn_relay("192.0.2.1:9000"),
            Err(SimError::AddressInUse("192.0.2.1:9000".into()))
        );
    }

    #[tokio::test]
    async fn start_requires_initialize_and_happens_once() {
        let network = SimNetwork::new(1);
        let module = network.module();
        assert_eq!(module.start(), Err(SimError::NotInitialized));

        module.initialize().await.unwrap();
        module.start().unwrap();
        assert_eq!(module.start(), Err(SimError::AlreadyStarted));
    }

    #[tokio::test]
    async fn send_before_start_is_rejected() {
        let network = SimNetwork::new(1);
        let module = network.module();
        module.initialize().await.unwrap();
        assert_eq!(module.send("hi"), Err(SimError::NotStarted));
        assert_eq!(module.connect("/memory/1"), Err(SimError::NotStarted));
    }

    #[tokio::test]
    async fn gossip_floods_through_relay() {
        let network = SimNetwork::new(3);
        network.spawn_relay("/ip4/127.0.0.1/udp/9000/webrtc-direct").unwrap();

        let (alice, _alice_rx) = started(&network).await;
        let (bob, mut bob_rx) = started(&network).await;
        let (carol, mut carol_rx) = started(&network).await;
        for module in [&alice, &bob, &carol] {
            module.connect("/ip4/127.0.0.1/udp/9000/webrtc-direct").unwrap();
        }

        alice.send("hello: world").unwrap();

        let expected = format!("{}:hello: world", alice.peer_id().unwrap());
        assert_eq!(bob_rx.try_recv().unwrap(), expected);
        assert_eq!(carol_rx.try_recv().unwrap(), expected);
    }

    #[tokio::test]
    async fn author_does_not_receive_own_message() {
        let network = SimNetwork::new(3);
        let (alice, mut alice_rx) = started(&network).await;
        let (bob, _bob_rx) = started(&network).await;
        alice.connect(&bob.listen_address().unwrap()).unwrap();

        alice.send("ping").unwrap();
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dial_without_listener_is_accepted() {
        let network = SimNetwork::new(3);
        let (alice, _rx) = started(&network).await;

        assert_eq!(alice.connect("192.0.2.1:9000"), Ok(()));
        assert!(network.links(&alice.peer_id().unwrap()).is_empty());
    }

    #[tokio::test]
    async fn dropping_module_unlinks_it() {
        let network = SimNetwork::new(3);
        let relay = network.spawn_relay("/memory/500").unwrap();
        let (alice, _rx) = started(&network).await;
        alice.connect("/memory/500").unwrap();
        assert_eq!(network.links(&relay).len(), 1);

        drop(alice);
        assert!(network.links(&relay).is_empty());
        assert_eq!(network.node_count(), 1);
    }
}
