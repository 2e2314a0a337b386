//! Reference model of observable focus behaviour.
//!
//! The model tracks which node holds focus and what the store records,
//! without events or microtasks. Each operation is applied as if its
//! microtasks ran to completion. It is the oracle the real enhancer is
//! verified against.

use focuslink_core::FocusTarget;

use super::operation::{Operation, OperationResult, focus_name, slot_name};

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableFocus {
    /// Store's focused element, as its string form.
    pub element: Option<String>,
    /// `id` attribute of the node holding focus.
    pub active: Option<String>,
}

#[derive(Debug, Clone)]
struct ModelNode {
    name: String,
    focus_id: Option<String>,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone, Default)]
pub struct FocusModel {
    /// Mounted nodes in document order.
    nodes: Vec<ModelNode>,
    /// Name of the focused node.
    active: Option<String>,
    /// Focused element recorded in the store.
    element: Option<FocusTarget>,
}

impl FocusModel {
    /// Empty document with a cleared store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation and settle.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match *op {
            Operation::Mount { slot, focus_id } => {
                let name = slot_name(slot);
                if self.position(&name).is_some() {
                    return OperationResult::Rejected;
                }
                self.nodes.push(ModelNode { name, focus_id: focus_id.map(focus_name) });
            },
            Operation::Unmount { slot } => {
                let name = slot_name(slot);
                let Some(index) = self.position(&name) else {
                    return OperationResult::Rejected;
                };
                self.nodes.remove(index);
                if self.active.as_deref() == Some(name.as_str()) {
                    self.active = None;
                    self.record(None);
                }
            },
            Operation::UserFocus { slot } => {
                let name = slot_name(slot);
                let Some(index) = self.position(&name) else {
                    return OperationResult::Rejected;
                };
                if self.active.as_deref() != Some(name.as_str()) {
                    let target = match &self.nodes[index].focus_id {
                        Some(id) => FocusTarget::from(id.as_str()),
                        None => FocusTarget::Unmanaged,
                    };
                    self.active = Some(name);
                    self.record(Some(target));
                }
            },
            Operation::UserBlur { slot } => {
                let name = slot_name(slot);
                if self.position(&name).is_none() {
                    return OperationResult::Rejected;
                }
                if self.active.as_deref() == Some(name.as_str()) {
                    self.active = None;
                    self.record(None);
                }
            },
            Operation::Dispatch { focus_id } => {
                self.record(Some(FocusTarget::from(focus_name(focus_id))));
            },
            Operation::DispatchUnmanaged => self.record(Some(FocusTarget::Unmanaged)),
            Operation::Clear | Operation::FocusOutToNothing => self.record(None),
            Operation::FocusOutWithSuccessor => {},
        }
        OperationResult::Ok
    }

    /// Extract observable state for comparison.
    pub fn observable(&self) -> ObservableFocus {
        ObservableFocus {
            element: self.element.as_ref().map(|target| target.as_str().to_string()),
            active: self.active.clone(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    /// Store a new element. Forward sync runs only when it changed.
    fn record(&mut self, element: Option<FocusTarget>) {
        if self.element == element {
            return;
        }
        self.element = element;

        match &self.element {
            Some(FocusTarget::Managed(id)) => {
                // First node in document order wins. Its own focusin records
                // the same identifier, so nothing feeds back.
                if let Some(node) =
                    self.nodes.iter().find(|node| node.focus_id.as_deref() == Some(id.as_str()))
                {
                    self.active = Some(node.name.clone());
                }
            },
            Some(FocusTarget::Unmanaged) => {},
            None => self.active = None,
        }
    }
}
