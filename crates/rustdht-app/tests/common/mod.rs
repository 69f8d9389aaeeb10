//! Shared fixtures for controller integration tests.

#![allow(dead_code)]

use std::future::Future;

use rustdht_app::{ClientState, Controller, ControllerConfig};
use rustdht_sim::{ManualClock, ScriptedModule};

/// Controller over a scripted module and a manual clock.
pub type TestController = Controller<ScriptedModule, ManualClock>;

/// Address used wherever a valid one is needed.
pub const PEER_ADDR: &str = "192.0.2.1:9000";

/// Fresh, unloaded controller.
pub fn controller() -> TestController {
    Controller::new(ScriptedModule::new(), ManualClock::at(0), ControllerConfig::default())
}

/// Controller driven into `state` through its public operations.
pub async fn controller_in(state: ClientState) -> TestController {
    let mut controller = controller();
    match state {
        ClientState::Unloaded => {},
        ClientState::Loading => {
            // Poll load once: the scripted module yields mid-initialize, so
            // the controller is left in flight.
            tokio::select! {
                biased;
                _ = controller.load() => {},
                () = std::future::ready(()) => {},
            }
        },
        ClientState::Ready => controller.load().await.unwrap(),
        ClientState::Started => {
            controller.load().await.unwrap();
            controller.start_client().unwrap();
        },
        ClientState::Connected => {
            controller.load().await.unwrap();
            controller.start_client().unwrap();
            controller.connect(PEER_ADDR).unwrap();
        },
    }
    assert_eq!(controller.state(), state);
    controller
}

/// Every lifecycle state.
pub const ALL_STATES: [ClientState; 5] = [
    ClientState::Unloaded,
    ClientState::Loading,
    ClientState::Ready,
    ClientState::Started,
    ClientState::Connected,
];

/// Run a future to completion on a fresh single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
}
