//! Real implementation driven by model operations.
//!
//! `SimWorld` translates each [`Operation`] into a scenario [`Step`] and runs
//! it against the real enhancer bound to a [`crate::SimDocument`]. Its observable
//! state is what model-based tests compare against [`crate::FocusModel`].

use focuslink_core::FocusConfig;

use crate::{
    FocusSnapshot, ObservableFocus, Operation, OperationResult, ScenarioError, ScenarioRunner,
    Step, focus_name, slot_name,
};

impl From<Operation> for Step {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Mount { slot, focus_id } => {
                Self::Mount { id: slot_name(slot), focus_id: focus_id.map(focus_name) }
            },
            Operation::Unmount { slot } => Self::Unmount { id: slot_name(slot) },
            Operation::UserFocus { slot } => Self::Focus { id: slot_name(slot) },
            Operation::UserBlur { slot } => Self::Blur { id: slot_name(slot) },
            Operation::Dispatch { focus_id } => Self::Dispatch { target: focus_name(focus_id) },
            Operation::DispatchUnmanaged => {
                Self::Dispatch { target: focuslink_core::UNMANAGED.to_string() }
            },
            Operation::Clear => Self::Clear,
            Operation::FocusOutToNothing => Self::FocusOut,
            Operation::FocusOutWithSuccessor => Self::FocusOutTo { id: "body".to_string() },
        }
    }
}

/// Real enhancer and simulated document under test.
pub struct SimWorld {
    runner: ScenarioRunner,
    max_step_microtasks: usize,
}

impl SimWorld {
    /// World with the default configuration.
    pub fn new() -> Result<Self, ScenarioError> {
        Self::with_config(FocusConfig::default())
    }

    /// World with an explicit configuration.
    pub fn with_config(config: FocusConfig) -> Result<Self, ScenarioError> {
        let mut runner = ScenarioRunner::new(config)?;
        // Successor for synthetic focusout events. Never focused by operations
        // because slot names are always `n<digit>`.
        runner.run_step(&Step::Mount { id: "body".to_string(), focus_id: None })?;

        Ok(Self { runner, max_step_microtasks: 0 })
    }

    /// Apply an operation and drain microtasks.
    ///
    /// Operations on unknown or duplicate nodes are rejected without effect,
    /// mirroring the model.
    pub fn apply(&mut self, op: &Operation) -> Result<OperationResult, ScenarioError> {
        match self.runner.run_step(&Step::from(*op)) {
            Ok(outcome) => {
                self.max_step_microtasks = self.max_step_microtasks.max(outcome.microtasks);
                Ok(OperationResult::Ok)
            },
            Err(ScenarioError::UnknownNode(_) | ScenarioError::DuplicateNode(_)) => {
                Ok(OperationResult::Rejected)
            },
            Err(error) => Err(error),
        }
    }

    /// Extract observable state for comparison with the model.
    pub fn observable(&self) -> ObservableFocus {
        ObservableFocus { element: self.runner.element(), active: self.runner.active_id() }
    }

    /// Snapshot for invariant checks.
    pub fn snapshot(&self) -> FocusSnapshot {
        self.runner.snapshot()
    }

    /// Most microtasks any single operation needed to settle.
    pub fn max_step_microtasks(&self) -> usize {
        self.max_step_microtasks
    }
}
