//! Fuzz target for inbound payload decoding
//!
//! Decoding must never panic, and every accepted payload must re-encode to
//! exactly the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rustdht_app::inbound;

fuzz_target!(|raw: &str| {
    match inbound::decode(raw) {
        Some(message) => {
            assert!(!message.peer.contains(inbound::DELIMITER));
            assert_eq!(inbound::encode(&message.peer, &message.body), raw);
        },
        None => assert!(!raw.contains(inbound::DELIMITER)),
    }
});
