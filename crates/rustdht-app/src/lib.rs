//! Application layer for RustDHT
//!
//! Client lifecycle controller and message bridge for an externally supplied
//! peer-to-peer module. The controller sequences user actions into calls
//! against the module and relays its asynchronous inbound notifications into
//! an observable conversation log, reporting every outcome through a
//! transcript.
//!
//! # Components
//!
//! - [`Controller`]: lifecycle state machine (load, start, connect, send)
//! - [`ModuleLoader`]: one-shot asynchronous module initialization
//! - [`PeerModule`]: seam to the external peer-to-peer module
//! - [`Transcript`] / [`ConversationLog`]: append-only observable sinks
//! - [`Driver`]: trait for platform-specific host I/O
//! - [`Runtime`]: generic orchestration loop using a Driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod controller;
mod conversation;
mod driver;
pub mod env;
mod error;
pub mod inbound;
mod loader;
mod module;
mod runtime;
mod state;
mod transcript;

pub use command::HostCommand;
pub use controller::{Controller, HostSignal};
pub use conversation::{ConversationEntry, ConversationLog, Direction};
pub use driver::Driver;
pub use env::Environment;
pub use error::{ControllerError, ModuleLoadError};
pub use inbound::InboundMessage;
pub use loader::ModuleLoader;
pub use module::{InboundReceiver, InboundSender, PeerModule, inbound_channel};
pub use runtime::Runtime;
pub use state::{ClientState, ControllerConfig, SessionView};
pub use transcript::{Transcript, TranscriptEntry};
