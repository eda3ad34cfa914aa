//! Menu (dropdown) state machine

use std::convert::Infallible;

use crate::collection::Collection;
use crate::effect::{DispatchResult, EffectReducer};
use crate::popup::{OpenState, PopupIntent, PopupState};
use crate::registry::{ItemDataRef, ItemId};
use crate::resolver::Focus;
use tui_primitives_macros::Action;

/// Menu state
#[derive(Clone, Debug, Default)]
pub struct MenuState {
    /// Whether the items surface is shown
    pub open: OpenState,
    /// Registered items, active item and type-ahead query
    pub collection: Collection,
}

impl MenuState {
    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.open == OpenState::Open
    }
}

/// Menu transitions
#[derive(Action, Clone, Debug)]
#[action(crate = "crate")]
pub enum MenuAction {
    /// Show the items; no-op when already open
    #[action(category = "visibility")]
    OpenMenu,
    /// Hide the items and drop the active item; no-op when already closed
    #[action(category = "visibility")]
    CloseMenu,
    /// Move the active item
    #[action(category = "navigation")]
    GoToItem(Focus),
    /// Append to the type-ahead query
    #[action(category = "search")]
    Search(char),
    /// Reset the type-ahead query
    #[action(category = "search")]
    ClearSearch,
    /// An item mounted
    #[action(category = "registry")]
    RegisterItem { id: ItemId, data: ItemDataRef },
    /// An item unmounted
    #[action(category = "registry")]
    UnregisterItem(ItemId),
}

/// Apply a [`MenuAction`]. Returns `false` for no-op transitions.
pub fn reducer(state: &mut MenuState, action: MenuAction) -> bool {
    match action {
        MenuAction::OpenMenu => {
            if state.is_open() {
                return false;
            }
            state.open = OpenState::Open;
            true
        }
        MenuAction::CloseMenu => {
            if !state.is_open() {
                return false;
            }
            state.open = OpenState::Closed;
            state.collection.deactivate();
            true
        }
        MenuAction::GoToItem(focus) => state.collection.go_to(&focus),
        MenuAction::Search(ch) => state.collection.search(ch),
        MenuAction::ClearSearch => state.collection.clear_search(),
        MenuAction::RegisterItem { id, data } => state.collection.register(id, data),
        MenuAction::UnregisterItem(id) => state.collection.unregister(&id),
    }
}

fn effect_reducer(state: &mut MenuState, action: MenuAction) -> DispatchResult<Infallible> {
    reducer(state, action).into()
}

impl PopupState for MenuState {
    type Action = MenuAction;
    type Effect = Infallible;

    const NAME: &'static str = "Menu";

    fn is_open(&self) -> bool {
        MenuState::is_open(self)
    }

    fn collection(&self) -> &Collection {
        &self.collection
    }

    fn action(intent: PopupIntent) -> Option<MenuAction> {
        Some(match intent {
            PopupIntent::Open => MenuAction::OpenMenu,
            PopupIntent::Close => MenuAction::CloseMenu,
            PopupIntent::GoTo(focus) => MenuAction::GoToItem(focus),
            PopupIntent::Search(ch) => MenuAction::Search(ch),
            PopupIntent::ClearSearch => MenuAction::ClearSearch,
            // Menu items run their own callbacks; nothing to commit
            PopupIntent::Activate(_) => return None,
        })
    }

    fn reducer() -> EffectReducer<Self, MenuAction, Infallible> {
        effect_reducer
    }
}
