//! Standard invariant checks.
//!
//! These hold after every settled step regardless of the operation sequence.
//! They deliberately avoid "state implies focus" rules: a recorded element
//! may legitimately have no mounted node yet.

use focuslink_core::FocusTarget;

use super::{FocusSnapshot, Invariant, InvariantResult, Violation};

/// A cleared store implies nothing in the document holds focus.
///
/// Clearing blurs the active node, and any native blur dispatches a clear,
/// so the two sides can only disagree while a microtask is pending.
pub struct ClearedMeansBlurred;

impl Invariant for ClearedMeansBlurred {
    fn name(&self) -> &'static str {
        "ClearedMeansBlurred"
    }

    fn check(&self, state: &FocusSnapshot) -> InvariantResult {
        match (&state.element, state.active) {
            (None, Some(active)) => Err(Violation {
                invariant: self.name(),
                message: format!("store is cleared but {active} holds focus"),
            }),
            _ => Ok(()),
        }
    }
}

/// No forward sync is left queued once a step settles.
pub struct MicrotasksDrained;

impl Invariant for MicrotasksDrained {
    fn name(&self) -> &'static str {
        "MicrotasksDrained"
    }

    fn check(&self, state: &FocusSnapshot) -> InvariantResult {
        if state.pending_microtasks == 0 {
            return Ok(());
        }
        Err(Violation {
            invariant: self.name(),
            message: format!("{} microtasks still queued", state.pending_microtasks),
        })
    }
}

/// The unmanaged sentinel never resolves to a node.
pub struct SentinelNeverResolves;

impl Invariant for SentinelNeverResolves {
    fn name(&self) -> &'static str {
        "SentinelNeverResolves"
    }

    fn check(&self, state: &FocusSnapshot) -> InvariantResult {
        match (&state.element, state.resolved) {
            (Some(FocusTarget::Unmanaged), Some(node)) => Err(Violation {
                invariant: self.name(),
                message: format!("unmanaged sentinel resolved to {node}"),
            }),
            _ => Ok(()),
        }
    }
}

/// Focus never rests on an unmounted node.
pub struct ActiveNodeConnected;

impl Invariant for ActiveNodeConnected {
    fn name(&self) -> &'static str {
        "ActiveNodeConnected"
    }

    fn check(&self, state: &FocusSnapshot) -> InvariantResult {
        if state.active_connected {
            return Ok(());
        }
        Err(Violation {
            invariant: self.name(),
            message: format!("active node {:?} is not connected", state.active),
        })
    }
}

#[cfg(test)]
mod tests {
    use focuslink_core::{Document, FocusId};

    use super::*;
    use crate::{Element, SimDocument};

    #[test]
    fn cleared_store_with_focus_violates() {
        let document = SimDocument::new();
        let node = document.append(Element::input());
        let snapshot = FocusSnapshot { active: Some(node), active_connected: true, ..Default::default() };

        let violation = ClearedMeansBlurred.check(&snapshot);
        assert!(violation.is_err_and(|v| v.invariant == "ClearedMeansBlurred"));
    }

    #[test]
    fn recorded_element_without_focus_is_allowed() {
        let snapshot = FocusSnapshot {
            element: Some(FocusTarget::Managed(FocusId::new("missing"))),
            active_connected: true,
            ..Default::default()
        };

        assert!(ClearedMeansBlurred.check(&snapshot).is_ok());
        assert!(SentinelNeverResolves.check(&snapshot).is_ok());
    }

    #[test]
    fn pending_microtasks_violate() {
        let snapshot = FocusSnapshot { pending_microtasks: 2, active_connected: true, ..Default::default() };

        assert!(MicrotasksDrained.check(&snapshot).is_err());
    }

    #[test]
    fn detached_active_node_violates() {
        let document = SimDocument::new();
        let node = document.append(Element::input());
        document.focus(&node);

        let snapshot = FocusSnapshot { active: Some(node), active_connected: false, ..Default::default() };
        assert!(ActiveNodeConnected.check(&snapshot).is_err());
    }
}
