//! Controller error types.
//!
//! Every [`ControllerError`] is converted into a transcript entry at the
//! boundary of the controller method that produced it. None of them are
//! fatal to the controller. [`ModuleLoadError`] is the only error the host is
//! expected to act on: it disables all subsequent actions until a restart.

use thiserror::Error;

use crate::ClientState;

/// Errors surfaced by controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Action attempted before its required lifecycle state.
    #[error("{action} is not available while {state}")]
    NotReady {
        /// Name of the rejected action.
        action: &'static str,
        /// State the controller was in.
        state: ClientState,
    },

    /// Empty or blank user input.
    #[error("invalid input: {field} must not be blank")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The external module rejected the call. The message is forwarded
    /// verbatim.
    #[error("external operation failed: {0}")]
    ExternalOperationFailed(String),

    /// Inbound payload could not be decoded into `(peer, body)`.
    #[error("undecodable inbound event: {raw:?}")]
    UndecodableEvent {
        /// The raw payload as delivered by the module.
        raw: String,
    },
}

/// External module failed to initialize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("module initialization failed: {detail}")]
pub struct ModuleLoadError {
    /// Underlying failure detail from the module.
    pub detail: String,
}

impl ModuleLoadError {
    /// Wrap an opaque module error.
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}
