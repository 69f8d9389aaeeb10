//! Property tests for controller invariants.

mod common;

use common::{ALL_STATES, block_on, controller, controller_in};
use proptest::prelude::*;
use rustdht_app::{ClientState, ControllerError, Direction};
use rustdht_sim::ModuleCall;

#[derive(Debug, Clone)]
enum Op {
    Load,
    Start,
    Connect(String),
    Send(String),
    Inbound(String),
    Clear,
    FailStart(bool),
    FailConnect(bool),
    FailSend(bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Load),
        Just(Op::Start),
        prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z0-9./:]{1,24}"]
            .prop_map(Op::Connect),
        "[ a-z]{0,12}".prop_map(Op::Send),
        "[a-z0-9:]{0,16}".prop_map(Op::Inbound),
        Just(Op::Clear),
        any::<bool>().prop_map(Op::FailStart),
        any::<bool>().prop_map(Op::FailConnect),
        any::<bool>().prop_map(Op::FailSend),
    ]
}

fn blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,8}"
}

fn fault(enabled: bool) -> Option<&'static str> {
    enabled.then_some("injected")
}

proptest! {
    #[test]
    fn state_never_regresses_without_restart(ops in prop::collection::vec(op_strategy(), 0..40)) {
        block_on(async {
            let mut controller = controller();
            let mut sent = 0;
            let mut received = 0;

            for op in ops {
                let before = controller.state();
                match op {
                    Op::Load => {
                        let _ = controller.load().await;
                    },
                    Op::Start => {
                        let _ = controller.start_client();
                    },
                    Op::Connect(address) => {
                        let _ = controller.connect(&address);
                    },
                    Op::Send(body) => {
                        if controller.send_message(&body).is_ok() {
                            sent += 1;
                        }
                    },
                    Op::Inbound(raw) => {
                        if controller.on_inbound_message(&raw).is_ok() {
                            received += 1;
                        }
                    },
                    Op::Clear => controller.clear_transcript(),
                    Op::FailStart(on) => controller.module().fail_start(fault(on)),
                    Op::FailConnect(on) => controller.module().fail_connect(fault(on)),
                    Op::FailSend(on) => controller.module().fail_send(fault(on)),
                }
                prop_assert!(controller.state() >= before, "{before} -> {}", controller.state());
            }

            let log = controller.conversation().entries();
            prop_assert_eq!(log.len(), sent + received);
            prop_assert_eq!(log.iter().filter(|e| e.direction == Direction::Sent).count(), sent);
            Ok(())
        })?;
    }

    #[test]
    fn blank_address_never_reaches_module(address in blank(), index in 0..ALL_STATES.len()) {
        block_on(async {
            let state = ALL_STATES[index];
            let mut controller = controller_in(state).await;
            let connects = controller.module().count(|c| matches!(c, ModuleCall::Connect(_)));

            let result = controller.connect(&address);

            prop_assert_eq!(result, Err(ControllerError::InvalidInput { field: "address" }));
            prop_assert_eq!(controller.state(), state);
            prop_assert_eq!(controller.module().count(|c| matches!(c, ModuleCall::Connect(_))), connects);
            Ok(())
        })?;
    }

    #[test]
    fn send_before_start_is_not_ready(body in "[a-z][a-z ]{0,31}", index in 0..3usize) {
        block_on(async {
            let state = [ClientState::Unloaded, ClientState::Loading, ClientState::Ready][index];
            let mut controller = controller_in(state).await;

            let result = controller.send_message(&body);

            let not_ready = matches!(result, Err(ControllerError::NotReady { action: "send", .. }));
            prop_assert!(not_ready);
            prop_assert!(controller.conversation().is_empty());
            prop_assert_eq!(controller.module().count(|c| matches!(c, ModuleCall::Send(_))), 0);
            prop_assert_eq!(controller.state(), state);
            Ok(())
        })?;
    }

    #[test]
    fn inbound_splits_on_first_delimiter(peer in "[a-zA-Z0-9]{0,16}", body in ".{0,32}") {
        block_on(async {
            let mut controller = controller_in(ClientState::Connected).await;

            let raw = format!("{peer}:{body}");
            prop_assert!(controller.on_inbound_message(&raw).is_ok());

            let entries = controller.conversation().entries();
            prop_assert_eq!(entries.len(), 1);
            prop_assert_eq!(&entries[0].peer, &peer);
            prop_assert_eq!(&entries[0].body, &body);
            prop_assert_eq!(entries[0].direction, Direction::Received);
            Ok(())
        })?;
    }

    #[test]
    fn inbound_without_delimiter_is_dropped(raw in "[^:]{0,32}") {
        block_on(async {
            let mut controller = controller_in(ClientState::Connected).await;

            let result = controller.on_inbound_message(&raw);

            prop_assert_eq!(result, Err(ControllerError::UndecodableEvent { raw: raw.clone() }));
            prop_assert!(controller.conversation().is_empty());
            Ok(())
        })?;
    }
}
