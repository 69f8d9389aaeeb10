//! Fuzz target for the Controller state machine
//!
//! # Strategy
//!
//! - Arbitrary sequences of user actions and inbound payloads
//! - Module faults toggled between actions
//!
//! # Invariants
//!
//! - State never moves backwards without a restart
//! - Conversation grows by at most one entry per action
//! - Blank addresses never reach the module

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rustdht_app::{Controller, ControllerConfig};
use rustdht_sim::{ManualClock, ModuleCall, ScriptedModule};

#[derive(Debug, Clone, Arbitrary)]
enum ControllerOp {
    Load,
    Start,
    Connect(String),
    Send(String),
    Inbound(String),
    Clear,
    Fault { start: bool, connect: bool, send: bool },
}

fuzz_target!(|ops: Vec<ControllerOp>| {
    let Ok(rt) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };

    rt.block_on(async {
        let mut controller =
            Controller::new(ScriptedModule::new(), ManualClock::at(0), ControllerConfig::default());

        for op in ops {
            let before = controller.state();
            let logged = controller.conversation().len();

            match op {
                ControllerOp::Load => {
                    let _ = controller.load().await;
                },
                ControllerOp::Start => {
                    let _ = controller.start_client();
                },
                ControllerOp::Connect(address) => {
                    let connects = controller.module().count(|c| matches!(c, ModuleCall::Connect(_)));
                    let _ = controller.connect(&address);
                    if address.trim().is_empty() {
                        assert_eq!(
                            controller.module().count(|c| matches!(c, ModuleCall::Connect(_))),
                            connects
                        );
                    }
                },
                ControllerOp::Send(body) => {
                    let _ = controller.send_message(&body);
                },
                ControllerOp::Inbound(raw) => {
                    let _ = controller.on_inbound_message(&raw);
                },
                ControllerOp::Clear => controller.clear_transcript(),
                ControllerOp::Fault { start, connect, send } => {
                    let module = controller.module();
                    module.fail_start(start.then_some("fuzz"));
                    module.fail_connect(connect.then_some("fuzz"));
                    module.fail_send(send.then_some("fuzz"));
                },
            }

            assert!(controller.state() >= before);
            assert!(controller.conversation().len() <= logged + 1);
        }
    });
});
