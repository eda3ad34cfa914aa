//! The environment the coordinators act on
//!
//! A host owns the widgets: it answers containment and focusability queries
//! and moves focus. Handles the coordinator does not have yet (a surface that
//! has not been laid out) are simply skipped.

use std::fmt::Debug;

use crate::registry::ItemId;

/// Environment contract for focus and hit-testing
pub trait Host {
    /// Handle to a widget (an element, an area, a component id)
    type Node: Clone + Debug + PartialEq;

    /// Whether `target` is `container` or lies inside it.
    fn contains(&self, container: &Self::Node, target: &Self::Node) -> bool;

    /// Whether `node` can take focus on its own.
    fn is_focusable(&self, node: &Self::Node) -> bool;

    /// Move focus to `node`.
    fn focus(&mut self, node: &Self::Node);

    /// Handle of the widget rendering the item, if the host tracks items.
    fn item_node(&self, _id: &ItemId) -> Option<Self::Node> {
        None
    }
}
