//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the CLI's terminal driver but
//! replays a queue of commands and records what was rendered, so the same
//! [`rustdht_app::Runtime`] orchestration runs in production and in tests.

use std::{collections::VecDeque, convert::Infallible, time::Duration};

use rustdht_app::{ClientState, Driver, HostCommand, SessionView};
use tokio::time::Instant;

/// A queued driver step.
#[derive(Debug, Clone)]
enum Step {
    Command(HostCommand),
    Idle(Duration),
}

/// Owned copy of a rendered [`SessionView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    /// Lifecycle state at render time.
    pub state: ClientState,
    /// Transcript texts, oldest first.
    pub transcript: Vec<String>,
    /// Conversation entries in display form, oldest first.
    pub conversation: Vec<String>,
}

impl From<SessionView<'_>> for RenderedView {
    fn from(view: SessionView<'_>) -> Self {
        Self {
            state: view.state,
            transcript: view.transcript.entries().map(|e| e.text.clone()).collect(),
            conversation: view.conversation.entries().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Simulation driver for deterministic testing.
///
/// Commands are handed out in queue order; `Idle` steps pause without
/// issuing a command so asynchronous peers get a chance to answer. An
/// exhausted queue ends the runtime.
#[derive(Debug, Default)]
pub struct SimDriver {
    steps: VecDeque<Step>,
    idle_until: Option<Instant>,
    renders: Vec<RenderedView>,
}

impl SimDriver {
    /// Create a driver with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver that replays `commands`.
    pub fn with_commands(commands: impl IntoIterator<Item = HostCommand>) -> Self {
        let mut driver = Self::new();
        for command in commands {
            driver.push(command);
        }
        driver
    }

    /// Queue a command.
    pub fn push(&mut self, command: HostCommand) {
        self.steps.push_back(Step::Command(command));
    }

    /// Queue a pause.
    pub fn idle(&mut self, duration: Duration) {
        self.steps.push_back(Step::Idle(duration));
    }

    /// Every rendered view, in order.
    pub fn renders(&self) -> &[RenderedView] {
        &self.renders
    }

    /// The most recent rendered view.
    pub fn last_render(&self) -> Option<&RenderedView> {
        self.renders.last()
    }

    /// Whether queued steps remain.
    pub fn has_pending(&self) -> bool {
        !self.steps.is_empty()
    }
}

impl Driver for SimDriver {
    // Replaying an in-memory queue cannot fail
    type Error = Infallible;

    async fn next_command(&mut self) -> Result<Option<HostCommand>, Self::Error> {
        loop {
            match self.steps.front() {
                None => return Ok(None),
                Some(Step::Command(_)) => {
                    if let Some(Step::Command(command)) = self.steps.pop_front() {
                        return Ok(Some(command));
                    }
                },
                Some(Step::Idle(duration)) => {
                    // Deadline survives cancellation so a racing inbound
                    // message does not restart the pause.
                    let deadline = *self.idle_until.get_or_insert_with(|| Instant::now() + *duration);
                    tokio::time::sleep_until(deadline).await;
                    self.idle_until = None;
                    self.steps.pop_front();
                },
            }
        }
    }

    fn render(&mut self, view: SessionView<'_>) -> Result<(), Self::Error> {
        self.renders.push(RenderedView::from(view));
        Ok(())
    }
}
