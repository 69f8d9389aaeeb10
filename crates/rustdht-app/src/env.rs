//! Environment abstraction for deterministic testing.
//!
//! Decouples controller logic from system resources. Production hosts read
//! the real wall clock in the local time zone; tests use a manual clock so
//! transcript timestamps are reproducible.

use chrono::{DateTime, FixedOffset};

/// Abstract environment providing wall-clock time.
///
/// # Invariants
///
/// - Implementations are cheap to clone and safe to share across tasks.
/// - Methods are infallible.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time, carrying the offset it should be shown in.
    ///
    /// Used only to stamp transcript entries for human diagnosis; ordering of
    /// entries never depends on it.
    fn now(&self) -> DateTime<FixedOffset>;
}
