//! Operations for model-based testing.
//!
//! Operations represent everything that can happen to a bound store: nodes
//! mounting and unmounting, the user moving focus, the application
//! dispatching, and synthetic events from outside the document. They are
//! generated randomly by proptest and applied to both the model and the real
//! implementation.

use arbitrary::Arbitrary;

/// Node slot. Slots are folded into a small set of node names so sequences
/// keep hitting the same nodes.
pub type Slot = u8;

/// Focus identifier index, folded like [`Slot`].
pub type ModelFocusId = u8;

/// Number of distinct node names.
pub const SLOTS: u8 = 6;

/// Number of distinct focus identifiers. Smaller than [`SLOTS`] so
/// duplicate identifiers show up.
pub const FOCUS_IDS: u8 = 3;

/// `id` attribute of the node in a slot.
pub fn slot_name(slot: Slot) -> String {
    format!("n{}", slot % SLOTS)
}

/// Focus identifier for an index.
pub fn focus_name(focus_id: ModelFocusId) -> String {
    format!("f{}", focus_id % FOCUS_IDS)
}

/// Operations that can be applied to a bound store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Append a node to the body.
    Mount {
        /// Node slot.
        slot: Slot,
        /// Focus identifier carried by the node. `None` mounts an unmanaged
        /// node.
        focus_id: Option<ModelFocusId>,
    },

    /// Remove a node, blurring it if it holds focus.
    Unmount {
        /// Node slot.
        slot: Slot,
    },

    /// The user focuses a node.
    UserFocus {
        /// Node slot.
        slot: Slot,
    },

    /// The user blurs a node.
    UserBlur {
        /// Node slot.
        slot: Slot,
    },

    /// The application requests focus on an identifier.
    Dispatch {
        /// Focus identifier index.
        focus_id: ModelFocusId,
    },

    /// The application records the unmanaged sentinel.
    DispatchUnmanaged,

    /// The application clears focus.
    Clear,

    /// Focus leaves the document (`focusout` with no related target).
    FocusOutToNothing,

    /// A `focusout` that names a successor node.
    FocusOutWithSuccessor,
}

/// Outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation was applied.
    Ok,
    /// Operation does not apply to the current tree (unknown or duplicate
    /// node) and changed nothing.
    Rejected,
}
