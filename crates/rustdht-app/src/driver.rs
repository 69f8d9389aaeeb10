//! Driver trait for abstracting host I/O.
//!
//! The [`Driver`] trait decouples the runtime from the presentation layer.
//! Each frontend implements it to supply user commands and render the
//! session, while the generic [`crate::Runtime`] handles orchestration.

use std::future::Future;

use crate::{HostCommand, SessionView};

/// Abstracts host I/O for the runtime.
///
/// # Implementations
///
/// - **CLI**: reads command lines from stdin, prints new transcript and
///   conversation entries to stdout
/// - **Simulation**: replays queued commands and records rendered views
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user command.
    ///
    /// Returns `None` when input is exhausted. Must be cancel safe: the
    /// runtime races it against inbound notifications.
    fn next_command(
        &mut self,
    ) -> impl Future<Output = Result<Option<HostCommand>, Self::Error>> + Send;

    /// Render the session.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn render(&mut self, view: SessionView<'_>) -> Result<(), Self::Error>;
}
