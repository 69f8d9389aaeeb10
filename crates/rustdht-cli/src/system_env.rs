//! Production Environment implementation using the system clock.

use chrono::{DateTime, FixedOffset, Local};
use rustdht_app::Environment;

/// Production environment reading the system clock in the local time zone.
#[derive(Clone, Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
