//! Fuzz target for HostCommand::parse
//!
//! Any line must parse without panicking. Plain text always becomes a message
//! carrying the trimmed line.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rustdht_app::HostCommand;

fuzz_target!(|line: &str| {
    let parsed = HostCommand::parse(line);
    let trimmed = line.trim();

    if trimmed.is_empty() {
        assert_eq!(parsed, None);
    } else if !trimmed.starts_with('/') {
        assert_eq!(parsed, Some(HostCommand::Send { body: trimmed.to_string() }));
    }
});
