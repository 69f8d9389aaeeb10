//! Client lifecycle controller.
//!
//! This module defines the [`Controller`] state machine, which sequences user
//! actions into calls against the external [`PeerModule`] and relays the
//! module's inbound notifications into the [`ConversationLog`].
//!
//! # Responsibilities
//!
//! - Owns [`ClientState`]; every transition happens inside a single `&mut
//!   self` call, so no partial transition is observable.
//! - Guards each action by state and input, forwarding only valid ones.
//! - Reports every outcome through the [`Transcript`]. Errors are returned to
//!   the caller for inspection but have already been reported; the host never
//!   has to handle them.
//! - Never enters an error state: a failed action leaves the controller at
//!   its last valid state so the user can retry.

use std::sync::Arc;

use crate::{
    ClientState, ControllerConfig, ControllerError, ConversationLog, Direction, Environment,
    InboundReceiver, ModuleLoadError, ModuleLoader, PeerModule, SessionView, Transcript, inbound,
};

/// Instruction for the host produced by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// Discard all in-memory state and rebuild the session from scratch.
    Reload,
}

/// Client lifecycle controller.
///
/// Generic over the peer module and the environment so the same logic runs
/// against the in-process simulation, scripted test modules, and real hosts.
pub struct Controller<M, E> {
    state: ClientState,
    loader: ModuleLoader<M>,
    module: Arc<M>,
    inbound: Option<InboundReceiver>,
    transcript: Transcript,
    conversation: ConversationLog,
    draft: String,
    config: ControllerConfig,
    env: E,
}

impl<M: PeerModule, E: Environment> Controller<M, E> {
    /// Create a controller and subscribe to the module's inbound channel.
    pub fn new(mut module: M, env: E, config: ControllerConfig) -> Self {
        let inbound = module.subscribe();
        if inbound.is_none() {
            tracing::warn!("peer module has no inbound channel, remote messages will be missed");
        }

        let module = Arc::new(module);
        Self {
            state: ClientState::Unloaded,
            loader: ModuleLoader::new(Arc::clone(&module)),
            module,
            inbound,
            transcript: Transcript::with_limit(config.transcript_limit),
            conversation: ConversationLog::new(),
            draft: String::new(),
            config,
            env,
        }
    }

    /// Initialize the external module.
    ///
    /// This is the only suspending operation. Once a terminal outcome exists
    /// further calls return it immediately without touching the transcript.
    ///
    /// Dropping the returned future before it resolves records no outcome:
    /// the state stays `Loading` and the next call runs `initialize` again.
    pub async fn load(&mut self) -> Result<(), ModuleLoadError> {
        if let Some(outcome) = self.loader.outcome() {
            return outcome;
        }

        self.state = ClientState::Loading;
        self.note("Initializing peer module...");

        match self.loader.load().await {
            Ok(()) => {
                self.transition(ClientState::Ready);
                self.note("Peer module initialized");
                self.note("Ready! Use /start to begin.");
                Ok(())
            },
            Err(e) => {
                self.transition(ClientState::Unloaded);
                self.note(format!("Failed to initialize: {}", e.detail));
                Err(e)
            },
        }
    }

    /// Arm the local participant.
    ///
    /// A no-op once started. Fails with [`ControllerError::NotReady`] before
    /// the module is loaded.
    pub fn start_client(&mut self) -> Result<(), ControllerError> {
        match self.state {
            ClientState::Ready => {},
            ClientState::Started | ClientState::Connected => {
                tracing::debug!(state = %self.state, "start ignored, client already started");
                return Ok(());
            },
            ClientState::Unloaded | ClientState::Loading => {
                return Err(self.reject_not_ready("start", "Peer module is not ready yet"));
            },
        }

        self.note("Starting P2P client...");
        match self.module.start() {
            Ok(()) => {
                self.transition(ClientState::Started);
                self.note("P2P client started");
                Ok(())
            },
            Err(e) => Err(self.external_failure("Failed to start client", &e)),
        }
    }

    /// Request a connection to `address`.
    ///
    /// Blank addresses are rejected in any state. Success means the module
    /// accepted the request for dispatch; confirmation, if any, arrives on the
    /// inbound channel.
    pub fn connect(&mut self, address: &str) -> Result<(), ControllerError> {
        let address = address.trim();
        if address.is_empty() {
            tracing::warn!("connect rejected, blank address");
            self.note("Please enter a server address");
            return Err(ControllerError::InvalidInput { field: "address" });
        }

        if !self.state.is_started() {
            return Err(self.reject_not_ready("connect", "Please start the client first"));
        }

        self.note(format!("Attempting to connect to: {address}"));
        match self.module.connect(address) {
            Ok(()) => {
                self.transition(ClientState::Connected);
                self.note("Connection request sent");
                Ok(())
            },
            Err(e) => Err(self.external_failure("Connection failed", &e)),
        }
    }

    /// Send a chat message.
    ///
    /// A blank body is a silent no-op. Otherwise the body is forwarded as
    /// typed; on success it is echoed into the conversation log as
    /// [`Direction::Sent`] and the draft is cleared.
    pub fn send_message(&mut self, body: &str) -> Result<(), ControllerError> {
        if body.trim().is_empty() {
            return Err(ControllerError::InvalidInput { field: "body" });
        }

        if !self.state.is_started() {
            return Err(self.reject_not_ready("send", "Please start the client first"));
        }

        match self.module.send(body) {
            Ok(()) => {
                tracing::debug!(len = body.len(), "message accepted for dispatch");
                self.conversation.append(self.config.local_peer.clone(), body, Direction::Sent);
                self.draft.clear();
                Ok(())
            },
            Err(e) => Err(self.external_failure("Failed to send message", &e)),
        }
    }

    /// Send the current draft. See [`Controller::send_message`].
    pub fn submit_draft(&mut self) -> Result<(), ControllerError> {
        let body = self.draft.clone();
        self.send_message(&body)
    }

    /// Route a raw inbound notification into the conversation log.
    ///
    /// Payloads without a delimiter are dropped with a transcript warning.
    pub fn on_inbound_message(&mut self, raw: &str) -> Result<(), ControllerError> {
        let Some(message) = inbound::decode(raw) else {
            tracing::warn!(raw, "dropping undecodable inbound payload");
            self.note(format!("Ignoring undecodable message: {raw}"));
            return Err(ControllerError::UndecodableEvent { raw: raw.to_string() });
        };

        tracing::debug!(peer = %message.peer, "message received");
        self.conversation.append(message.peer, message.body, Direction::Received);
        Ok(())
    }

    /// Hard reset.
    ///
    /// The module exposes no in-place restart, so the host must discard this
    /// controller together with its module and build a new session.
    pub fn restart(&mut self) -> HostSignal {
        self.note("Restarting client...");
        self.transition(ClientState::Unloaded);
        HostSignal::Reload
    }

    /// Empty the transcript.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Await the next raw inbound payload.
    ///
    /// Pends forever once the module has dropped its end of the channel, so
    /// it can sit in a `select!` without spinning.
    pub async fn next_inbound(&mut self) -> String {
        if let Some(rx) = self.inbound.as_mut() {
            if let Some(raw) = rx.recv().await {
                return raw;
            }
            tracing::debug!("inbound channel closed");
            self.inbound = None;
        }
        std::future::pending().await
    }

    /// Replace the pending input.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Pending, unsent input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Operational transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Conversation log.
    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    /// The driven peer module.
    pub fn module(&self) -> &M {
        &self.module
    }

    /// Controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Read-only snapshot for rendering.
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            state: self.state,
            transcript: &self.transcript,
            conversation: &self.conversation,
            draft: &self.draft,
        }
    }

    fn transition(&mut self, next: ClientState) {
        if self.state != next {
            tracing::info!(from = %self.state, to = %next, "client state changed");
            self.state = next;
        }
    }

    fn note(&mut self, text: impl Into<String>) {
        let now = self.env.now();
        self.transcript.append(now, text);
    }

    fn reject_not_ready(&mut self, action: &'static str, hint: &str) -> ControllerError {
        tracing::warn!(action, state = %self.state, "action rejected, client not ready");
        self.note(hint);
        ControllerError::NotReady { action, state: self.state }
    }

    fn external_failure(&mut self, context: &str, error: &M::Error) -> ControllerError {
        tracing::warn!(error = %error, "{context}");
        self.note(format!("{context}: {error}"));
        ControllerError::ExternalOperationFailed(error.to_string())
    }
}
