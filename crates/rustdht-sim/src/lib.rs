//! In-process peer module and deterministic harness for RustDHT.
//!
//! [`SimModule`] implements [`rustdht_app::PeerModule`] on top of an
//! in-memory gossip network, standing in for the compiled peer-to-peer
//! module so the controller can be exercised end to end without sockets.
//!
//! # Harness
//!
//! - [`ScriptedModule`]: records every call and injects failures
//! - [`ManualClock`]: [`rustdht_app::Environment`] with settable time
//! - [`SimDriver`]: [`rustdht_app::Driver`] replaying queued commands

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod echo;
pub mod network;
pub mod scripted;
pub mod sim_driver;

pub use clock::ManualClock;
pub use echo::{EchoPeer, spawn_echo_peer};
pub use network::{SimError, SimModule, SimModuleConfig, SimNetwork};
pub use scripted::{ModuleCall, ScriptedError, ScriptedModule};
pub use sim_driver::{RenderedView, SimDriver};
