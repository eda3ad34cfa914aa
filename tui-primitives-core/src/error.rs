//! Errors surfaced to callers
//!
//! Reducers never fail. These errors report misuse (a part constructed
//! without its parent) and bad configuration.

use std::panic::Location;

use thiserror::Error;

/// Result alias for fallible primitive operations
pub type Result<T, E = PrimitiveError> = std::result::Result<T, E>;

/// Errors produced by tui-primitives
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// A part was constructed without a handle to its required parent.
    #[error("<{component} /> is missing a parent <{parent} /> component (at {location})")]
    MissingParent {
        /// Offending part, e.g. `Menu.Item`
        component: &'static str,
        /// Required ancestor, e.g. `Menu`
        parent: &'static str,
        /// Where the part was constructed
        location: &'static Location<'static>,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A keybinding string could not be parsed.
    #[error("invalid key {key:?} bound to {command:?}")]
    InvalidKey {
        /// Command the key was bound to
        command: String,
        /// The unparseable key string
        key: String,
    },
}

impl PrimitiveError {
    /// Build a [`PrimitiveError::MissingParent`] pointing at the caller.
    #[track_caller]
    pub fn missing_parent(component: &'static str, parent: &'static str) -> Self {
        Self::MissingParent {
            component,
            parent,
            location: Location::caller(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parent_message_names_both_parts() {
        let err = PrimitiveError::missing_parent("Menu.Item", "Menu");
        let message = err.to_string();
        assert!(message.starts_with("<Menu.Item /> is missing a parent <Menu /> component"));
        assert!(message.contains(file!()));
    }

    #[test]
    fn test_config_error_from_json() {
        let err: PrimitiveError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, PrimitiveError::Config(_)));
    }
}
