//! Fuzz target for scenario step parsing
//!
//! # Invariants
//!
//! - Parsing arbitrary text never panics
//! - Any step that parses renders to text that parses back to the same step

#![no_main]

use focuslink_harness::Step;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let Ok(step) = input.parse::<Step>() else {
        return;
    };

    let rendered = step.to_string();
    match rendered.parse::<Step>() {
        Ok(reparsed) => assert_eq!(reparsed, step, "round trip changed {rendered:?}"),
        Err(error) => panic!("rendered step {rendered:?} does not parse: {error}"),
    }
});
