//! Fuzz target for text condensing.
//!
//! Tests that `condense_text` never panics, never splits a character, and
//! respects the length bound for any input and any bound.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sl_redact::condense_text;

fuzz_target!(|input: (&str, u16)| {
    let (text, max) = input;
    let max = usize::from(max);
    let out = condense_text(text, max);
    // The ellipsis marker is the only thing allowed to exceed tiny bounds
    assert!(out.chars().count() <= max.max(3));
});
