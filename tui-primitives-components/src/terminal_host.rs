//! [`Host`] implementation over terminal screen areas
//!
//! Views place their parts as named areas after each render. Containment is
//! the parent chain between areas; hit-testing picks the deepest area under
//! the pointer, or [`NodeId::Screen`] when nothing is there.

use std::collections::HashMap;

use ratatui::layout::{Position, Rect};
use tui_primitives_core::{Host, ItemId};

/// A node in the terminal host
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// Bare screen outside every placed area
    Screen,
    /// A placed area
    Named(String),
}

impl NodeId {
    /// Named node.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<&ItemId> for NodeId {
    fn from(id: &ItemId) -> Self {
        Self::named(id.as_str())
    }
}

#[derive(Clone, Debug)]
struct Area {
    rect: Rect,
    parent: Option<NodeId>,
    focusable: bool,
    order: u64,
}

/// Terminal areas, their nesting, and the focused one
#[derive(Clone, Debug, Default)]
pub struct TerminalHost {
    areas: HashMap<NodeId, Area>,
    focused: Option<NodeId>,
    next_order: u64,
}

impl TerminalHost {
    /// Empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or move) an area. Later placements win hit-test ties.
    pub fn place(&mut self, id: NodeId, rect: Rect, parent: Option<NodeId>, focusable: bool) {
        self.next_order += 1;
        self.areas.insert(
            id,
            Area {
                rect,
                parent,
                focusable,
                order: self.next_order,
            },
        );
    }

    /// Remove an area. Focus on it is dropped.
    pub fn remove(&mut self, id: &NodeId) {
        self.areas.remove(id);
        if self.focused.as_ref() == Some(id) {
            self.focused = None;
        }
    }

    /// Where an area was last placed.
    pub fn rect(&self, id: &NodeId) -> Option<Rect> {
        self.areas.get(id).map(|area| area.rect)
    }

    /// Focused node, if any.
    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    /// Whether `id` currently has focus.
    pub fn is_focused(&self, id: &NodeId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    fn depth(&self, id: &NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.areas.get(id).and_then(|area| area.parent.as_ref());
        while let Some(parent) = current {
            depth += 1;
            if depth > self.areas.len() {
                break;
            }
            current = self.areas.get(parent).and_then(|area| area.parent.as_ref());
        }
        depth
    }

    /// Deepest area under the cell at `column`, `row`.
    pub fn hit_test(&self, column: u16, row: u16) -> NodeId {
        let point = Position::new(column, row);
        self.areas
            .iter()
            .filter(|(_, area)| area.rect.contains(point))
            .max_by_key(|(id, area)| (self.depth(id), area.order))
            .map(|(id, _)| id.clone())
            .unwrap_or(NodeId::Screen)
    }
}

impl Host for TerminalHost {
    type Node = NodeId;

    fn contains(&self, container: &NodeId, target: &NodeId) -> bool {
        if container == target {
            return true;
        }
        let mut current = self.areas.get(target).and_then(|area| area.parent.as_ref());
        let mut steps = 0;
        while let Some(node) = current {
            if node == container {
                return true;
            }
            steps += 1;
            if steps > self.areas.len() {
                return false;
            }
            current = self.areas.get(node).and_then(|area| area.parent.as_ref());
        }
        false
    }

    fn is_focusable(&self, node: &NodeId) -> bool {
        self.areas.get(node).is_some_and(|area| area.focusable)
    }

    fn focus(&mut self, node: &NodeId) {
        if !self.areas.contains_key(node) {
            tracing::trace!(?node, "Focus target not placed; ignoring");
            return;
        }
        tracing::trace!(?node, "Focus moved");
        self.focused = Some(node.clone());
    }

    fn item_node(&self, id: &ItemId) -> Option<NodeId> {
        let node = NodeId::from(id);
        self.areas.contains_key(&node).then_some(node)
    }
}
