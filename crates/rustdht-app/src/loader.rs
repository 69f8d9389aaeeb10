//! One-shot module initialization.
//!
//! [`ModuleLoader`] guards the module's asynchronous initialization with a
//! [`OnceCell`]: concurrent callers share a single in-flight attempt and all
//! observe the same terminal outcome. A terminal outcome, success or failure,
//! is never recomputed. Recovering from a failed load requires a fresh module.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{ModuleLoadError, PeerModule};

/// Loader for an external [`PeerModule`].
pub struct ModuleLoader<M> {
    module: Arc<M>,
    outcome: OnceCell<Result<(), ModuleLoadError>>,
}

impl<M: PeerModule> ModuleLoader<M> {
    /// Create a loader for `module`.
    pub fn new(module: Arc<M>) -> Self {
        Self { module, outcome: OnceCell::new() }
    }

    /// Initialize the module, at most once.
    ///
    /// Callers arriving while an attempt is in flight wait for it rather than
    /// starting a second one. After completion this returns immediately.
    pub async fn load(&self) -> Result<(), ModuleLoadError> {
        self.outcome
            .get_or_init(|| async {
                tracing::info!("initializing peer module");
                match self.module.initialize().await {
                    Ok(()) => {
                        tracing::info!("peer module initialized");
                        Ok(())
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "peer module initialization failed");
                        Err(ModuleLoadError::new(e.to_string()))
                    },
                }
            })
            .await
            .clone()
    }

    /// Terminal outcome. `None` while unloaded or in flight.
    pub fn outcome(&self) -> Option<Result<(), ModuleLoadError>> {
        self.outcome.get().cloned()
    }

    /// Whether initialization completed successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(())))
    }
}
