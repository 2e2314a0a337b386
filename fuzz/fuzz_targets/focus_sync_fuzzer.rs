//! Fuzz target for focus synchronization
//!
//! Drives the real enhancer on a simulated document with arbitrary operation
//! sequences and compares it against the reference model.
//!
//! # Strategy
//!
//! - Mount/unmount churn: nodes appear and disappear between dispatches
//! - Duplicate identifiers: several nodes share a focus identifier
//! - Interleaving: user focus, application dispatch and synthetic focusout
//! - Both configurations: with and without the reentrancy guard
//!
//! # Invariants
//!
//! - Every operation settles within the microtask limit
//! - Real and model observable state agree after every operation
//! - Standard invariants hold after every operation
//! - NEVER panic inside the engine

#![no_main]

use arbitrary::Arbitrary;
use focuslink_core::FocusConfig;
use focuslink_harness::{FocusModel, InvariantRegistry, Operation, SimWorld};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    guard_reentrancy: bool,
    ops: Vec<Operation>,
}

fuzz_target!(|input: Input| {
    let config = FocusConfig::default().with_reentrancy_guard(input.guard_reentrancy);
    let Ok(mut real) = SimWorld::with_config(config) else {
        return;
    };
    let mut model = FocusModel::new();
    let registry = InvariantRegistry::standard();

    for op in input.ops.iter().take(256) {
        let model_result = model.apply(op);
        let real_result = match real.apply(op) {
            Ok(result) => result,
            Err(error) => panic!("operation {op:?} failed: {error}"),
        };

        assert_eq!(model_result, real_result, "result divergence on {op:?}");
        assert_eq!(model.observable(), real.observable(), "state divergence on {op:?}");
        if let Err(violations) = registry.check_all(&real.snapshot()) {
            panic!("invariant violation after {op:?}: {violations:?}");
        }
    }
});
