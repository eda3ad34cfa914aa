//! Listbox (select) state machine
//!
//! Same trigger + surface shape as the menu, plus a committed value. Options
//! carry a value of type `V`; selecting an option emits
//! [`ListboxEffect::Change`] only when the value actually changes.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::collection::Collection;
use crate::effect::{DispatchResult, EffectReducer};
use crate::popup::{OpenState, PopupIntent, PopupState};
use crate::registry::{ItemDataRef, ItemId};
use crate::resolver::Focus;
use tui_primitives_macros::Action;

/// Bounds required of a listbox or radio group value
pub trait OptionValue: Clone + Debug + PartialEq + Send + 'static {}

impl<T: Clone + Debug + PartialEq + Send + 'static> OptionValue for T {}

/// Listbox state
#[derive(Clone, Debug)]
pub struct ListboxState<V> {
    /// Whether the options surface is shown
    pub open: OpenState,
    /// Registered options, active option and type-ahead query
    pub collection: Collection,
    /// Committed value
    pub value: Option<V>,
    /// A disabled listbox never opens
    pub disabled: bool,
    values: HashMap<ItemId, V>,
}

impl<V> Default for ListboxState<V> {
    fn default() -> Self {
        Self {
            open: OpenState::Closed,
            collection: Collection::default(),
            value: None,
            disabled: false,
            values: HashMap::new(),
        }
    }
}

impl<V: OptionValue> ListboxState<V> {
    /// Closed listbox with an initial value.
    pub fn with_value(value: Option<V>) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Whether the listbox is open.
    pub fn is_open(&self) -> bool {
        self.open == OpenState::Open
    }

    /// Value carried by an option.
    pub fn value_of(&self, id: &ItemId) -> Option<&V> {
        self.values.get(id)
    }

    /// Whether the option holds the committed value.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        match (&self.value, self.values.get(id)) {
            (Some(value), Some(option)) => value == option,
            _ => false,
        }
    }

    /// Id of the first option holding the committed value.
    pub fn selected_id(&self) -> Option<&ItemId> {
        self.collection
            .items()
            .iter()
            .map(|item| &item.id)
            .find(|id| self.is_selected(id))
    }
}

/// Listbox transitions
#[derive(Action, Clone, Debug)]
#[action(crate = "crate")]
pub enum ListboxAction<V: OptionValue> {
    /// Show the options; starts at the selected option
    #[action(category = "visibility")]
    OpenListbox,
    /// Hide the options and drop the active option
    #[action(category = "visibility")]
    CloseListbox,
    /// Move the active option
    #[action(category = "navigation")]
    GoToOption(Focus),
    /// Append to the type-ahead query
    #[action(category = "search")]
    Search(char),
    /// Reset the type-ahead query
    #[action(category = "search")]
    ClearSearch,
    /// An option mounted
    #[action(category = "registry")]
    RegisterOption {
        id: ItemId,
        data: ItemDataRef,
        value: V,
    },
    /// An option unmounted
    #[action(category = "registry")]
    UnregisterOption(ItemId),
    /// Commit an option's value
    #[action(category = "selection")]
    Select(ItemId),
    /// Controlled value update; never notifies
    #[action(category = "selection")]
    SetValue(Option<V>),
    /// Enable or disable the whole listbox
    SetDisabled(bool),
}

/// Effects emitted by the listbox reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListboxEffect<V> {
    /// The committed value changed through user interaction
    Change(V),
}

/// Apply a [`ListboxAction`].
pub fn reducer<V: OptionValue>(
    state: &mut ListboxState<V>,
    action: ListboxAction<V>,
) -> DispatchResult<ListboxEffect<V>> {
    match action {
        ListboxAction::OpenListbox => {
            if state.is_open() || state.disabled {
                return DispatchResult::unchanged();
            }
            state.open = OpenState::Open;
            if let Some(selected) = state.selected_id().cloned() {
                state.collection.go_to(&Focus::Specific(selected));
            }
            DispatchResult::changed()
        }
        ListboxAction::CloseListbox => {
            if !state.is_open() {
                return DispatchResult::unchanged();
            }
            state.open = OpenState::Closed;
            state.collection.deactivate();
            DispatchResult::changed()
        }
        ListboxAction::GoToOption(focus) => state.collection.go_to(&focus).into(),
        ListboxAction::Search(ch) => state.collection.search(ch).into(),
        ListboxAction::ClearSearch => state.collection.clear_search().into(),
        ListboxAction::RegisterOption { id, data, value } => {
            if !state.collection.register(id.clone(), data) {
                return DispatchResult::unchanged();
            }
            state.values.insert(id, value);
            DispatchResult::changed()
        }
        ListboxAction::UnregisterOption(id) => {
            if !state.collection.unregister(&id) {
                return DispatchResult::unchanged();
            }
            state.values.remove(&id);
            DispatchResult::changed()
        }
        ListboxAction::Select(id) => {
            let Some(item) = state.collection.get(&id) else {
                return DispatchResult::unchanged();
            };
            if item.is_disabled() || state.disabled {
                return DispatchResult::unchanged();
            }
            let Some(value) = state.values.get(&id).cloned() else {
                return DispatchResult::unchanged();
            };
            if state.value.as_ref() == Some(&value) {
                return DispatchResult::unchanged();
            }
            state.value = Some(value.clone());
            DispatchResult::changed_with(ListboxEffect::Change(value))
        }
        ListboxAction::SetValue(value) => {
            if state.value == value {
                return DispatchResult::unchanged();
            }
            state.value = value;
            DispatchResult::changed()
        }
        ListboxAction::SetDisabled(disabled) => {
            if state.disabled == disabled {
                return DispatchResult::unchanged();
            }
            state.disabled = disabled;
            if disabled && state.is_open() {
                state.open = OpenState::Closed;
                state.collection.deactivate();
            }
            DispatchResult::changed()
        }
    }
}

impl<V: OptionValue> PopupState for ListboxState<V> {
    type Action = ListboxAction<V>;
    type Effect = ListboxEffect<V>;

    const NAME: &'static str = "Listbox";

    fn is_open(&self) -> bool {
        ListboxState::is_open(self)
    }

    fn collection(&self) -> &Collection {
        &self.collection
    }

    fn action(intent: PopupIntent) -> Option<ListboxAction<V>> {
        Some(match intent {
            PopupIntent::Open => ListboxAction::OpenListbox,
            PopupIntent::Close => ListboxAction::CloseListbox,
            PopupIntent::GoTo(focus) => ListboxAction::GoToOption(focus),
            PopupIntent::Search(ch) => ListboxAction::Search(ch),
            PopupIntent::ClearSearch => ListboxAction::ClearSearch,
            PopupIntent::Activate(id) => ListboxAction::Select(id),
        })
    }

    fn reducer() -> EffectReducer<Self, ListboxAction<V>, ListboxEffect<V>> {
        reducer::<V>
    }

    fn opening_focus(&self, requested: Focus) -> Focus {
        match self.selected_id() {
            Some(id) if !self.collection.get(id).is_some_and(|item| item.is_disabled()) => {
                Focus::Specific(id.clone())
            }
            _ => requested,
        }
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}
