//! Scripted peer module for controller tests.
//!
//! Records every call the controller makes and fails on demand, so tests can
//! assert both "no external call was issued" and "external failure leaves
//! state unchanged".

use std::sync::{Mutex, MutexGuard, PoisonError};

use rustdht_app::{InboundReceiver, InboundSender, PeerModule, inbound_channel};
use thiserror::Error;

/// Failure injected by a [`ScriptedModule`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ScriptedError(pub String);

/// A call observed by a [`ScriptedModule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleCall {
    /// `initialize()`
    Initialize,
    /// `start()`
    Start,
    /// `connect(address)`
    Connect(String),
    /// `send(body)`
    Send(String),
}

#[derive(Default)]
struct Faults {
    initialize: Option<String>,
    start: Option<String>,
    connect: Option<String>,
    send: Option<String>,
}

/// Peer module that records calls and returns scripted results.
pub struct ScriptedModule {
    calls: Mutex<Vec<ModuleCall>>,
    faults: Mutex<Faults>,
    inbound_tx: InboundSender,
    inbound_rx: Option<InboundReceiver>,
}

impl Default for ScriptedModule {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedModule {
    /// Create a module where every call succeeds.
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = inbound_channel();
        Self {
            calls: Mutex::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
            inbound_tx,
            inbound_rx: Some(inbound_rx),
        }
    }

    /// Make `initialize` fail with `message`.
    #[must_use]
    pub fn failing_initialize(self, message: &str) -> Self {
        lock(&self.faults).initialize = Some(message.to_string());
        self
    }

    /// Make `start` fail with `message`, or succeed again with `None`.
    pub fn fail_start(&self, message: Option<&str>) {
        lock(&self.faults).start = message.map(str::to_string);
    }

    /// Make `connect` fail with `message`, or succeed again with `None`.
    pub fn fail_connect(&self, message: Option<&str>) {
        lock(&self.faults).connect = message.map(str::to_string);
    }

    /// Make `send` fail with `message`, or succeed again with `None`.
    pub fn fail_send(&self, message: Option<&str>) {
        lock(&self.faults).send = message.map(str::to_string);
    }

    /// Deliver a raw inbound payload as if a remote message arrived.
    pub fn inject_inbound(&self, raw: &str) {
        // Receiver gone means the controller was dropped; nothing to deliver.
        let _ = self.inbound_tx.send(raw.to_string());
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<ModuleCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ModuleCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: ModuleCall) {
        lock(&self.calls).push(call);
    }

    fn outcome(fault: Option<&String>) -> Result<(), ScriptedError> {
        fault.map_or(Ok(()), |message| Err(ScriptedError(message.clone())))
    }
}

impl PeerModule for ScriptedModule {
    type Error = ScriptedError;

    async fn initialize(&self) -> Result<(), ScriptedError> {
        self.record(ModuleCall::Initialize);
        // Give concurrent loaders a chance to interleave.
        tokio::task::yield_now().await;
        let fault = lock(&self.faults).initialize.clone();
        Self::outcome(fault.as_ref())
    }

    fn start(&self) -> Result<(), ScriptedError> {
        self.record(ModuleCall::Start);
        Self::outcome(lock(&self.faults).start.as_ref())
    }

    fn connect(&self, address: &str) -> Result<(), ScriptedError> {
        self.record(ModuleCall::Connect(address.to_string()));
        Self::outcome(lock(&self.faults).connect.as_ref())
    }

    fn send(&self, body: &str) -> Result<(), ScriptedError> {
        self.record(ModuleCall::Send(body.to_string()));
        Self::outcome(lock(&self.faults).send.as_ref())
    }

    fn subscribe(&mut self) -> Option<InboundReceiver> {
        self.inbound_rx.take()
    }
}
