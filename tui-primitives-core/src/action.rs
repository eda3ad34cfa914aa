//! Action traits for type-safe state transitions

use std::fmt::Debug;

/// Marker trait for intents that can be dispatched to a primitive's store
///
/// Actions describe a requested transition. They should be:
/// - Clone: actions are logged and recorded by middleware
/// - Debug: for tracing output and test assertions
/// - Send + 'static: deferred work delivers them across task boundaries
///
/// Use `#[derive(Action)]` from `tui-primitives-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Actions that can be grouped by the part of the state machine they touch
///
/// The built-in primitives use the categories `"visibility"`, `"navigation"`,
/// `"search"`, `"registry"` and `"selection"`.
pub trait ActionCategory: Action {
    /// Category of this action, if any
    fn category(&self) -> Option<&'static str>;
}
