//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must hold after every settled step.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all operation sequences.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = FocusSnapshot::capture(&document, &*store.get_state(), "data-focus");
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{ActiveNodeConnected, ClearedMeansBlurred, MicrotasksDrained, SentinelNeverResolves};
pub use snapshot::FocusSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against a [`FocusSnapshot`].
pub trait Invariant {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the snapshot.
    fn check(&self, state: &FocusSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard focus invariants.
    ///
    /// Includes:
    /// - [`ClearedMeansBlurred`]: no focus while the store is cleared
    /// - [`MicrotasksDrained`]: nothing left queued
    /// - [`SentinelNeverResolves`]: `unmanaged` has no node
    /// - [`ActiveNodeConnected`]: focus is on a mounted node
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(ClearedMeansBlurred);
        registry.add(MicrotasksDrained);
        registry.add(SentinelNeverResolves);
        registry.add(ActiveNodeConnected);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &FocusSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
