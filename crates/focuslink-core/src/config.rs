//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Attribute carried by managed nodes unless configured otherwise.
pub const DEFAULT_FOCUS_ATTRIBUTE: &str = "data-focus";

/// Configuration for [`crate::FocusEnhancer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Name of the focus selector attribute on managed nodes.
    pub attribute: String,

    /// Ignore native focus events raised while the engine itself is moving
    /// focus.
    ///
    /// Off by default: the reducer's no-op rule already terminates the
    /// feedback cycle on hosts whose focus calls are idempotent. Enable on
    /// hosts that re-fire events for no-op focus or blur calls.
    pub guard_reentrancy: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self { attribute: DEFAULT_FOCUS_ATTRIBUTE.to_string(), guard_reentrancy: false }
    }
}

impl FocusConfig {
    /// Use a different focus selector attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// Enable or disable the reentrancy guard.
    #[must_use]
    pub fn with_reentrancy_guard(mut self, enabled: bool) -> Self {
        self.guard_reentrancy = enabled;
        self
    }

    /// Check that the attribute name is usable in an attribute selector.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute.is_empty() {
            return Err(ConfigError::EmptyAttribute);
        }

        match self
            .attribute
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '=' | '>' | '/'))
        {
            Some(character) => {
                Err(ConfigError::InvalidAttribute { attribute: self.attribute.clone(), character })
            },
            None => Ok(()),
        }
    }
}
