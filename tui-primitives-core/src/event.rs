//! Input events delivered to the coordinators, and what handling them did

use crossterm::event::KeyEvent;

use crate::registry::ItemId;

/// Input for a [`PopupCoordinator`](crate::coordinator::PopupCoordinator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent<N> {
    /// Key pressed while the trigger has focus
    TriggerKey(KeyEvent),
    /// Trigger clicked
    TriggerClick,
    /// Key pressed while the surface has focus
    SurfaceKey(KeyEvent),
    /// Item clicked
    ItemClick(ItemId),
    /// Pointer moved over an item
    ItemPointerMove(ItemId),
    /// Pointer left an item
    ItemPointerLeave(ItemId),
    /// Pointer pressed anywhere in the host
    PointerDown(N),
}

/// Input for a [`RadioGroupController`](crate::coordinator::RadioGroupController)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioEvent {
    /// Key pressed while an option has focus
    Key(KeyEvent),
    /// Option clicked
    Click(ItemId),
    /// An option received focus (tab, or host-driven)
    Focus(ItemId),
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<E> {
    /// Whether any state changed
    pub changed: bool,
    /// Whether the host should suppress its default handling of the event
    pub consumed: bool,
    /// Effects emitted by the reducer (value changes)
    pub effects: Vec<E>,
}

impl<E> Default for Outcome<E> {
    fn default() -> Self {
        Self::ignored()
    }
}

impl<E> Outcome<E> {
    /// Event not handled.
    pub fn ignored() -> Self {
        Self {
            changed: false,
            consumed: false,
            effects: Vec::new(),
        }
    }

    /// Event handled; the host must not act on it.
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::ignored()
        }
    }

    /// Fold a dispatch result into this outcome.
    pub fn absorb(&mut self, changed: bool, effects: Vec<E>) {
        self.changed |= changed;
        self.effects.extend(effects);
    }
}
