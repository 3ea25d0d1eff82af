//! Fuzz target for the redaction pipeline.
//!
//! Tests that `redact` handles arbitrary input without panicking and stays
//! idempotent: scrubbing already-scrubbed text must change nothing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sl_redact::redact;

fuzz_target!(|data: &str| {
    let once = redact(data);
    let twice = redact(&once);
    assert_eq!(once, twice);
});
