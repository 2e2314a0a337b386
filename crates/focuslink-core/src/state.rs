//! Observable focus state.
//!
//! [`FocusState`] is the only persisted entity. It is created once with no
//! focused element when the store is built and only changes through
//! [`crate::FocusAction`]s.

use serde::{Deserialize, Serialize};

use crate::FocusTarget;

/// Focus slice of the application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusState {
    /// Element the system considers focused. `None` if nothing is focused.
    pub element: Option<FocusTarget>,
}

impl FocusState {
    /// State with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// State focused on the given target.
    pub fn focused(target: impl Into<FocusTarget>) -> Self {
        Self { element: Some(target.into()) }
    }

    /// Focused element as a string, `None` if nothing is focused.
    pub fn element_str(&self) -> Option<&str> {
        self.element.as_ref().map(FocusTarget::as_str)
    }
}

/// State types that embed a [`FocusState`] slice.
///
/// The engine reads the focus slice through this trait, so the focus state
/// can live inside a larger combined application state.
pub trait FocusSlice {
    /// The embedded focus slice.
    fn focus_state(&self) -> &FocusState;
}

impl FocusSlice for FocusState {
    fn focus_state(&self) -> &FocusState {
        self
    }
}
