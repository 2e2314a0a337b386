//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! enhancer bound to a simulated document behaves identically to the
//! reference model after every settled step.
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      FocusModel      SimWorld        Compare
//!      (reference)   (real engine)   observables
//! ```

use focuslink_core::FocusConfig;
use focuslink_harness::{FocusModel, InvariantRegistry, Operation, OperationResult, SimWorld};
use proptest::prelude::*;

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let slot = any::<u8>();
    let focus_id = any::<u8>();

    prop_oneof![
        3 => (slot.clone(), prop::option::of(focus_id.clone()))
            .prop_map(|(slot, focus_id)| Operation::Mount { slot, focus_id }),
        1 => slot.clone().prop_map(|slot| Operation::Unmount { slot }),
        3 => slot.clone().prop_map(|slot| Operation::UserFocus { slot }),
        1 => slot.prop_map(|slot| Operation::UserBlur { slot }),
        3 => focus_id.prop_map(|focus_id| Operation::Dispatch { focus_id }),
        1 => Just(Operation::DispatchUnmanaged),
        1 => Just(Operation::Clear),
        1 => Just(Operation::FocusOutToNothing),
        1 => Just(Operation::FocusOutWithSuccessor),
    ]
}

fn run_against_model(config: FocusConfig, ops: &[Operation]) -> Result<(), TestCaseError> {
    let registry = InvariantRegistry::standard();
    let mut model = FocusModel::new();
    let mut real = SimWorld::with_config(config).map_err(|e| TestCaseError::fail(e.to_string()))?;

    for (i, op) in ops.iter().enumerate() {
        let model_result = model.apply(op);
        let real_result = real.apply(op).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(model_result, real_result, "result divergence at operation {}: {:?}", i, op);
        prop_assert_eq!(
            model.observable(),
            real.observable(),
            "state divergence at operation {}: {:?}",
            i,
            op
        );

        let snapshot = real.snapshot();
        if let Err(violations) = registry.check_all(&snapshot) {
            return Err(TestCaseError::fail(format!(
                "invariant violation after operation {i} {op:?}: {violations:?}"
            )));
        }
    }

    // Backward sync never changes state after forward sync settles, so one
    // operation needs at most one forward-sync microtask.
    prop_assert!(real.max_step_microtasks() <= 1, "feedback loop: {}", real.max_step_microtasks());
    Ok(())
}

proptest! {
    /// Real engine matches the model with default configuration.
    #[test]
    fn prop_model_matches_real(ops in prop::collection::vec(operation_strategy(), 0..60)) {
        run_against_model(FocusConfig::default(), &ops)?;
    }

    /// The reentrancy guard changes nothing observable on a well-behaved
    /// host.
    #[test]
    fn prop_guarded_model_matches_real(ops in prop::collection::vec(operation_strategy(), 0..60)) {
        run_against_model(FocusConfig::default().with_reentrancy_guard(true), &ops)?;
    }

    /// Rejected operations never change observable state.
    #[test]
    fn prop_rejected_operations_are_inert(ops in prop::collection::vec(operation_strategy(), 0..40)) {
        let mut model = FocusModel::new();

        for op in &ops {
            let before = model.observable();
            if model.apply(op) == OperationResult::Rejected {
                prop_assert_eq!(before, model.observable());
            }
        }
    }
}

#[test]
fn scripted_sequence_matches_model() {
    let ops = [
        Operation::Mount { slot: 0, focus_id: Some(0) },
        Operation::Mount { slot: 1, focus_id: Some(0) },
        Operation::Mount { slot: 2, focus_id: None },
        Operation::UserFocus { slot: 1 },
        Operation::Dispatch { focus_id: 2 },
        Operation::UserFocus { slot: 2 },
        Operation::Unmount { slot: 2 },
        Operation::Dispatch { focus_id: 0 },
        Operation::FocusOutWithSuccessor,
        Operation::FocusOutToNothing,
    ];

    let result = run_against_model(FocusConfig::default(), &ops);
    assert!(result.is_ok(), "{result:?}");
}
