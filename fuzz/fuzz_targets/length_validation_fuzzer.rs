//! Fuzz target for length validation
//!
//! # Invariants
//!
//! - Result always within `[MIN_LENGTH, MAX_LENGTH]`
//! - Validation is idempotent on its own output
//! - NEVER panic, whatever the input

#![no_main]

use genpass_core::{MAX_LENGTH, MIN_LENGTH, validate_length};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw: &str| {
    let length = validate_length(raw);
    assert!((MIN_LENGTH..=MAX_LENGTH).contains(&length), "{raw:?} -> {length}");
    assert_eq!(validate_length(&length.to_string()), length);
});
