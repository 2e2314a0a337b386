//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the store's focus slice together with the document's
//! focus state at one point in time. Invariants operate on snapshots rather
//! than live state so a check never observes a half-applied step.

use focuslink_core::{Document, FocusSlice, FocusTarget, selector};

use crate::{NodeId, SimDocument};

/// Snapshot of one store/document pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusSnapshot {
    /// Focused element recorded in the store.
    pub element: Option<FocusTarget>,
    /// Node holding real focus.
    pub active: Option<NodeId>,
    /// Whether the active node is still mounted. `true` when nothing is
    /// active.
    pub active_connected: bool,
    /// Node the recorded element resolves to right now.
    pub resolved: Option<NodeId>,
    /// Microtasks still queued on the document.
    pub pending_microtasks: usize,
}

impl FocusSnapshot {
    /// Capture the current state of `document` and `state`.
    pub fn capture<S: FocusSlice>(document: &SimDocument, state: &S, attribute: &str) -> Self {
        let element = state.focus_state().element.clone();
        let active = document.active_element();
        let resolved =
            element.as_ref().and_then(|target| selector::resolve(document, attribute, target));

        Self {
            element,
            active,
            active_connected: active.is_none_or(|node| document.is_connected(node)),
            resolved,
            pending_microtasks: document.pending_microtasks(),
        }
    }
}
