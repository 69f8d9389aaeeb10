//! Terminal client for RustDHT
//!
//! A thin shell over [`rustdht_app::Driver`] that provides line-oriented
//! terminal I/O. All orchestration logic lives in the generic
//! [`rustdht_app::Runtime`].
//!
//! This crate only handles reading commands and printing the session.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod system_env;
pub mod terminal;

pub use rustdht_app::{Driver, HostCommand, Runtime};
pub use system_env::SystemEnv;
pub use terminal::{CliError, TerminalDriver};
