//! Focus intents.
//!
//! This module defines the [`FocusAction`] enum, the only two instructions
//! that change the focus slice of a store, and the [`FocusTarget`] value
//! they carry. Actions are produced by the synchronization engine in response
//! to native focus events, or by application code that wants to move focus
//! programmatically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved target value for focus resting on a node without a focus
/// selector attribute.
pub const UNMANAGED: &str = "unmanaged";

/// Identifier advertised by a managed node's focus selector attribute.
///
/// Opaque to the engine. Uniqueness across mounted nodes is assumed, not
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FocusId(String);

impl FocusId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FocusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the state considers focused.
///
/// Converting the string [`UNMANAGED`] always yields [`FocusTarget::Unmanaged`],
/// so a node advertising that value is indistinguishable from an untracked
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FocusTarget {
    /// A node that opted into tracking.
    Managed(FocusId),
    /// A real node that carries no focus selector attribute.
    Unmanaged,
}

impl FocusTarget {
    /// Target as the string stored in state snapshots.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Managed(id) => id.as_str(),
            Self::Unmanaged => UNMANAGED,
        }
    }

    /// Managed identifier, `None` for the sentinel.
    pub fn managed_id(&self) -> Option<&FocusId> {
        match self {
            Self::Managed(id) => Some(id),
            Self::Unmanaged => None,
        }
    }
}

impl From<&str> for FocusTarget {
    fn from(value: &str) -> Self {
        if value == UNMANAGED { Self::Unmanaged } else { Self::Managed(FocusId::new(value)) }
    }
}

impl From<String> for FocusTarget {
    fn from(value: String) -> Self {
        if value == UNMANAGED { Self::Unmanaged } else { Self::Managed(FocusId(value)) }
    }
}

impl From<FocusTarget> for String {
    fn from(target: FocusTarget) -> Self {
        match target {
            FocusTarget::Managed(id) => id.0,
            FocusTarget::Unmanaged => UNMANAGED.to_string(),
        }
    }
}

impl From<FocusId> for FocusTarget {
    fn from(id: FocusId) -> Self {
        Self::from(id.0)
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions that change the focus slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FocusAction {
    /// Set the focus target.
    Focus {
        /// Target the state should consider focused.
        target: FocusTarget,
    },

    /// Clear the focus target.
    Clear,
}

/// Build a [`FocusAction::Focus`] for the given identifier.
pub fn focus(target: impl Into<FocusTarget>) -> FocusAction {
    FocusAction::Focus { target: target.into() }
}

/// Build a [`FocusAction::Clear`].
pub fn clear_focus() -> FocusAction {
    FocusAction::Clear
}

/// Application action types that can carry a [`FocusAction`].
///
/// Lets the engine share a store with unrelated application state: it
/// dispatches focus actions through `From<FocusAction>` and the focus
/// reducer ignores every action for which
/// [`as_focus_action`](FocusActionLike::as_focus_action) returns `None`.
pub trait FocusActionLike: From<FocusAction> {
    /// The wrapped focus action, `None` for foreign actions.
    fn as_focus_action(&self) -> Option<&FocusAction>;
}

impl FocusActionLike for FocusAction {
    fn as_focus_action(&self) -> Option<&FocusAction> {
        Some(self)
    }
}
