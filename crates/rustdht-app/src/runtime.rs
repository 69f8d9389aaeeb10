//! Generic runtime for session orchestration.
//!
//! The Runtime drives the host event loop, coordinating between:
//! - [`Controller`]: lifecycle state machine
//! - [`PeerModule`]: external module, rebuilt from a factory on restart
//! - [`Driver`]: platform-specific host I/O
//!
//! User commands and inbound notifications are independent triggers. Each is
//! handled to completion before the next one is taken, so the controller
//! only ever sees one trigger at a time.

use crate::{
    Controller, ControllerConfig, Driver, Environment, HostCommand, HostSignal, PeerModule,
};

/// One unit of work for the event loop.
enum Step {
    Command(Option<HostCommand>),
    Inbound(String),
}

/// Generic runtime that orchestrates Controller, module, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `M`: Peer module implementation
/// - `E`: Environment for wall-clock time
/// - `F`: Factory producing a fresh module for every session
pub struct Runtime<D, M, E, F> {
    driver: D,
    factory: F,
    env: E,
    controller: Controller<M, E>,
    sessions: u64,
}

impl<D, M, E, F> Runtime<D, M, E, F>
where
    D: Driver,
    M: PeerModule,
    E: Environment,
    F: FnMut() -> M,
{
    /// Create a runtime. The first module is built immediately but not
    /// loaded until [`Runtime::run`].
    pub fn new(driver: D, env: E, config: ControllerConfig, mut factory: F) -> Self {
        let controller = Controller::new(factory(), env.clone(), config);
        Self { driver, factory, env, controller, sessions: 1 }
    }

    /// Run the event loop until the driver runs out of input or the user
    /// quits.
    ///
    /// A failed module load is not fatal to the loop: the controller stays
    /// `Unloaded`, every action reports `NotReady`, and a restart builds a
    /// fresh module.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.load().await?;

        loop {
            // Inbound first: messages that already arrived are logged before
            // the next command is taken.
            let step = tokio::select! {
                biased;
                raw = self.controller.next_inbound() => Step::Inbound(raw),
                command = self.driver.next_command() => Step::Command(command?),
            };

            match step {
                Step::Command(None) => break,
                Step::Command(Some(command)) => {
                    if self.handle_command(command).await? {
                        break;
                    }
                },
                Step::Inbound(raw) => {
                    // Already reported to the transcript
                    let _ = self.controller.on_inbound_message(&raw);
                },
            }

            self.driver.render(self.controller.view())?;
        }

        tracing::info!(sessions = self.sessions, "runtime stopped");
        Ok(())
    }

    /// Handle one user command. Returns `true` if the runtime should stop.
    async fn handle_command(&mut self, command: HostCommand) -> Result<bool, D::Error> {
        let outcome = match command {
            HostCommand::Start => self.controller.start_client(),
            HostCommand::Connect { address } => self.controller.connect(&address),
            HostCommand::Send { body } => {
                self.controller.set_draft(body);
                self.controller.submit_draft()
            },
            HostCommand::ClearTranscript => {
                self.controller.clear_transcript();
                Ok(())
            },
            HostCommand::Restart => {
                match self.controller.restart() {
                    HostSignal::Reload => self.reload().await?,
                }
                Ok(())
            },
            HostCommand::Quit => return Ok(true),
        };

        if let Err(e) = outcome {
            tracing::debug!(error = %e, "command rejected");
        }
        Ok(false)
    }

    /// Discard the current session and start a new one from the factory.
    async fn reload(&mut self) -> Result<(), D::Error> {
        self.driver.render(self.controller.view())?;

        // Configuration carries over; everything else starts fresh
        let config = self.controller.config().clone();
        let module = (self.factory)();
        self.controller = Controller::new(module, self.env.clone(), config);
        self.sessions += 1;
        tracing::info!(session = self.sessions, "session rebuilt");

        self.load().await
    }

    async fn load(&mut self) -> Result<(), D::Error> {
        self.driver.render(self.controller.view())?;
        if let Err(e) = self.controller.load().await {
            tracing::error!(error = %e, "peer module unavailable, actions disabled until restart");
        }
        self.driver.render(self.controller.view())
    }

    /// The current session's controller.
    pub fn controller(&self) -> &Controller<M, E> {
        &self.controller
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Number of sessions built so far, including the current one.
    pub fn sessions(&self) -> u64 {
        self.sessions
    }
}
