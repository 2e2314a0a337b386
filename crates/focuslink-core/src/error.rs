//! Error types for the focus synchronization core.
//!
//! Focus edge cases (unknown identifiers, foreign actions, blurs with a
//! successor) are policy decisions and never surface as errors. Errors only
//! exist where the store or the configuration is misused.

use thiserror::Error;

/// Errors returned by [`crate::Store::dispatch`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// A reducer tried to dispatch while the store was reducing.
    #[error("reducers may not dispatch actions")]
    ReentrantDispatch,
}

/// Errors from validating a [`crate::FocusConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Attribute name is empty.
    #[error("focus attribute name is empty")]
    EmptyAttribute,

    /// Attribute name contains a character that cannot appear in an
    /// attribute name.
    #[error("invalid character {character:?} in focus attribute name {attribute:?}")]
    InvalidAttribute {
        /// The rejected attribute name.
        attribute: String,
        /// First offending character.
        character: char,
    },
}
