//! Model-based testing: operations and the reference model.

mod operation;
mod world;

pub use operation::{
    FOCUS_IDS, ModelFocusId, Operation, OperationResult, SLOTS, Slot, focus_name, slot_name,
};
pub use world::{FocusModel, ObservableFocus};
