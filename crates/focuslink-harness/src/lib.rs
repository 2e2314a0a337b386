//! Deterministic simulation harness for focus synchronization testing.
//!
//! [`SimDocument`] implements the [`focuslink_core::Document`] trait with an
//! in-memory node tree, synchronous focus events and an explicitly drained
//! microtask queue, so every interleaving is reproducible.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of the observable
//! focus behaviour. Operations are applied to both the [`FocusModel`] and a
//! [`SimWorld`] running the real enhancer, and their observable states are
//! compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks properties that must hold after every
//! settled step. Use [`InvariantRegistry::standard()`] for the common set.
//!
//! # Scenarios
//!
//! The `scenario` module parses textual steps (`mount a=name`, `focus a`,
//! `dispatch name`, ...) and runs them against a bound store. The command
//! line simulator is built on it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod scenario;
pub mod sim_document;
pub mod sim_world;

pub use invariants::{
    ActiveNodeConnected, ClearedMeansBlurred, FocusSnapshot, Invariant, InvariantRegistry,
    InvariantResult, MicrotasksDrained, SentinelNeverResolves, Violation,
};
pub use model::{FocusModel, ObservableFocus, Operation, OperationResult, focus_name, slot_name};
pub use scenario::{ScenarioError, ScenarioRunner, Step, StepOutcome};
pub use sim_document::{Element, MICROTASK_LIMIT, NodeId, SimDocument, SimError};
pub use sim_world::SimWorld;
