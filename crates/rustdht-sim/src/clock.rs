//! Manual wall clock.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use rustdht_app::Environment;

/// Environment whose wall clock only moves when told to.
///
/// Clones share the same clock. Times read in UTC unless an offset is set
/// with [`ManualClock::with_offset`].
#[derive(Clone, Debug)]
pub struct ManualClock {
    secs: Arc<AtomicI64>,
    offset: FixedOffset,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(0)
    }
}

impl ManualClock {
    /// Create a clock reading `secs` since the Unix epoch.
    pub fn at(secs: i64) -> Self {
        Self { secs: Arc::new(AtomicI64::new(secs)), offset: Utc.fix() }
    }

    /// Show times in `offset`, as a host in that time zone would.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Environment for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        // Out-of-range readings clamp to the epoch
        DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0)
            .unwrap_or_default()
            .with_timezone(&self.offset)
    }
}
