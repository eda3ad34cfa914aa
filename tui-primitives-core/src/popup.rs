//! What the focus coordinator needs to know about a popup primitive
//!
//! Menu and Listbox share the trigger + popup surface shape. Each implements
//! [`PopupState`] so one [`PopupCoordinator`](crate::coordinator::PopupCoordinator)
//! drives both.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::collection::Collection;
use crate::effect::EffectReducer;
use crate::registry::ItemId;
use crate::resolver::Focus;

/// Whether the popup surface is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenState {
    /// Surface visible
    Open,
    /// Surface hidden
    #[default]
    Closed,
}

/// Primitive-independent transitions the coordinator requests
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupIntent {
    /// Show the surface
    Open,
    /// Hide the surface
    Close,
    /// Navigate
    GoTo(Focus),
    /// Type-ahead
    Search(char),
    /// Reset type-ahead
    ClearSearch,
    /// Commit an item (select it, for primitives that hold a value)
    Activate(ItemId),
}

/// A popup primitive's state as seen by the coordinator
pub trait PopupState: Debug + Sized + 'static {
    /// Action type of the primitive
    type Action: Action;
    /// Effects the reducer can emit
    type Effect: Debug;

    /// Name used in log lines and error messages, e.g. `"Menu"`
    const NAME: &'static str;

    /// Whether the surface is open
    fn is_open(&self) -> bool;

    /// Registered items, active index and query
    fn collection(&self) -> &Collection;

    /// Translate a coordinator intent into the primitive's action.
    ///
    /// `None` means the primitive has no transition for it.
    fn action(intent: PopupIntent) -> Option<Self::Action>;

    /// The primitive's reducer.
    fn reducer() -> EffectReducer<Self, Self::Action, Self::Effect>;

    /// Where keyboard opening should land, given the requested target.
    fn opening_focus(&self, requested: Focus) -> Focus {
        requested
    }

    /// Whether the primitive refuses to open at all.
    fn is_disabled(&self) -> bool {
        false
    }
}
