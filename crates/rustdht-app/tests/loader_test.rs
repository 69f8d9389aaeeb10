//! Module loader tests: at-most-once initialization and cached outcomes.

use std::sync::Arc;

use rustdht_app::{ModuleLoadError, ModuleLoader};
use rustdht_sim::{ModuleCall, ScriptedModule, SimModuleConfig, SimNetwork};

#[tokio::test]
async fn concurrent_loads_share_one_initialization() {
    let module = Arc::new(ScriptedModule::new());
    let loader = ModuleLoader::new(Arc::clone(&module));

    let (first, second) = tokio::join!(loader.load(), loader.load());

    assert_eq!(first, Ok(()));
    assert_eq!(first, second);
    assert_eq!(module.calls(), [ModuleCall::Initialize]);
    assert!(loader.is_loaded());
}

#[tokio::test]
async fn concurrent_failures_observe_same_error() {
    let module = Arc::new(ScriptedModule::new().failing_initialize("fetch failed"));
    let loader = ModuleLoader::new(Arc::clone(&module));

    let (first, second) = tokio::join!(loader.load(), loader.load());

    assert_eq!(first, Err(ModuleLoadError::new("fetch failed")));
    assert_eq!(first, second);
    assert_eq!(module.count(|c| *c == ModuleCall::Initialize), 1);
    assert!(!loader.is_loaded());
}

#[tokio::test]
async fn outcome_is_empty_until_load_completes() {
    let loader = ModuleLoader::new(Arc::new(ScriptedModule::new()));
    assert_eq!(loader.outcome(), None);

    loader.load().await.unwrap();

    assert_eq!(loader.outcome(), Some(Ok(())));
}

#[tokio::test]
async fn failed_outcome_is_never_retried() {
    let module = Arc::new(ScriptedModule::new().failing_initialize("boom"));
    let loader = ModuleLoader::new(Arc::clone(&module));

    for _ in 0..3 {
        assert!(loader.load().await.is_err());
    }

    assert_eq!(module.count(|c| *c == ModuleCall::Initialize), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_initialization_is_awaited_by_all_callers() {
    let network = SimNetwork::new(3);
    let config = SimModuleConfig { init_delay: std::time::Duration::from_millis(250) };
    let loader = Arc::new(ModuleLoader::new(Arc::new(network.module_with(config))));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(()));
    }
    assert!(loader.is_loaded());
}
