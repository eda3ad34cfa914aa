//! Radio group state machine
//!
//! No open/closed dimension: the collection's active item is the focused
//! option, and the committed value is the checked one.

use std::collections::HashMap;

use crate::collection::Collection;
use crate::effect::DispatchResult;
use crate::listbox::OptionValue;
use crate::registry::{ItemDataRef, ItemId};
use crate::resolver::{calculate_active_index, Focus};
use tui_primitives_macros::Action;

/// Radio group state
#[derive(Clone, Debug)]
pub struct RadioGroupState<V> {
    /// Registered options and the focused one
    pub collection: Collection,
    /// Checked value
    pub value: Option<V>,
    /// A disabled group ignores navigation and selection
    pub disabled: bool,
    values: HashMap<ItemId, V>,
}

impl<V> Default for RadioGroupState<V> {
    fn default() -> Self {
        Self {
            collection: Collection::default(),
            value: None,
            disabled: false,
            values: HashMap::new(),
        }
    }
}

impl<V: OptionValue> RadioGroupState<V> {
    /// Group with an initial value.
    pub fn with_value(value: Option<V>) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Value carried by an option.
    pub fn value_of(&self, id: &ItemId) -> Option<&V> {
        self.values.get(id)
    }

    /// Whether the option is checked.
    pub fn is_checked(&self, id: &ItemId) -> bool {
        match (&self.value, self.values.get(id)) {
            (Some(value), Some(option)) => value == option,
            _ => false,
        }
    }

    /// Id of the checked option.
    pub fn checked_id(&self) -> Option<&ItemId> {
        self.collection
            .items()
            .iter()
            .map(|item| &item.id)
            .find(|id| self.is_checked(id))
    }

    /// The option that takes part in the tab sequence.
    ///
    /// The checked option when there is one, otherwise the first enabled one.
    pub fn tab_stop(&self) -> Option<&ItemId> {
        if self.disabled {
            return None;
        }
        self.checked_id().or_else(|| {
            calculate_active_index(&Focus::First, self.collection.items(), None)
                .map(|idx| &self.collection.items()[idx].id)
        })
    }
}

/// Radio group transitions
#[derive(Action, Clone, Debug)]
#[action(crate = "crate")]
pub enum RadioGroupAction<V: OptionValue> {
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
    /// Move focus between options
    #[action(category = "navigation")]
    GoToOption(Focus),
    /// Check an option (and focus it)
    #[action(category = "selection")]
    Select(ItemId),
    /// Controlled value update; never notifies
    #[action(category = "selection")]
    SetValue(Option<V>),
    /// Enable or disable the whole group
    SetDisabled(bool),
}

/// Effects emitted by the radio group reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RadioGroupEffect<V> {
    /// The checked value changed through user interaction
    Change(V),
}

/// Apply a [`RadioGroupAction`].
pub fn reducer<V: OptionValue>(
    state: &mut RadioGroupState<V>,
    action: RadioGroupAction<V>,
) -> DispatchResult<RadioGroupEffect<V>> {
    match action {
        RadioGroupAction::RegisterOption { id, data, value } => {
            if !state.collection.register(id.clone(), data) {
                return DispatchResult::unchanged();
            }
            state.values.insert(id, value);
            DispatchResult::changed()
        }
        RadioGroupAction::UnregisterOption(id) => {
            if !state.collection.unregister(&id) {
                return DispatchResult::unchanged();
            }
            state.values.remove(&id);
            DispatchResult::changed()
        }
        RadioGroupAction::GoToOption(_) | RadioGroupAction::Select(_) if state.disabled => {
            DispatchResult::unchanged()
        }
        RadioGroupAction::GoToOption(focus) => state.collection.go_to(&focus).into(),
        RadioGroupAction::Select(id) => {
            let Some(item) = state.collection.get(&id) else {
                return DispatchResult::unchanged();
            };
            if item.is_disabled() {
                return DispatchResult::unchanged();
            }
            let focused = state.collection.go_to(&Focus::Specific(id.clone()));
            let Some(value) = state.values.get(&id).cloned() else {
                return focused.into();
            };
            if state.value.as_ref() == Some(&value) {
                return focused.into();
            }
            state.value = Some(value.clone());
            DispatchResult::changed_with(RadioGroupEffect::Change(value))
        }
        RadioGroupAction::SetValue(value) => {
            if state.value == value {
                return DispatchResult::unchanged();
            }
            state.value = value;
            DispatchResult::changed()
        }
        RadioGroupAction::SetDisabled(disabled) => {
            if state.disabled == disabled {
                return DispatchResult::unchanged();
            }
            state.disabled = disabled;
            DispatchResult::changed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ItemData;

    fn group() -> RadioGroupState<u32> {
        let mut state = RadioGroupState::default();
        for (id, value, disabled) in [("s", 1, false), ("m", 2, true), ("l", 3, false)] {
            let mut data = ItemData::text(id);
            data.disabled = disabled;
            reducer(
                &mut state,
                RadioGroupAction::RegisterOption {
                    id: ItemId::from(id),
                    data: data.into(),
                    value,
                },
            );
        }
        state
    }

    #[test]
    fn test_repeat_clicks_notify_once() {
        let mut state = group();
        let mut changes = Vec::new();
        for _ in 0..3 {
            let result = reducer(&mut state, RadioGroupAction::Select(ItemId::from("l")));
            changes.extend(result.effects);
        }
        assert_eq!(changes, vec![RadioGroupEffect::Change(3)]);
        assert!(state.is_checked(&ItemId::from("l")));
    }

    #[test]
    fn test_select_focuses_option() {
        let mut state = group();
        reducer(&mut state, RadioGroupAction::Select(ItemId::from("l")));
        assert_eq!(
            state.collection.active_id().map(|id| id.as_str()),
            Some("l")
        );
    }

    #[test]
    fn test_disabled_option_ignored() {
        let mut state = group();
        let result = reducer(&mut state, RadioGroupAction::Select(ItemId::from("m")));
        assert!(!result.changed);
        assert_eq!(state.value, None);
    }

    #[test]
    fn test_navigation_skips_disabled() {
        let mut state = group();
        reducer(&mut state, RadioGroupAction::GoToOption(Focus::First));
        reducer(&mut state, RadioGroupAction::GoToOption(Focus::Next));
        assert_eq!(
            state.collection.active_id().map(|id| id.as_str()),
            Some("l")
        );
    }

    #[test]
    fn test_disabled_group() {
        let mut state = group();
        reducer(&mut state, RadioGroupAction::SetDisabled(true));
        assert!(!reducer(&mut state, RadioGroupAction::Select(ItemId::from("s"))).changed);
        assert!(!reducer(&mut state, RadioGroupAction::GoToOption(Focus::First)).changed);
        assert_eq!(state.tab_stop(), None);
    }

    #[test]
    fn test_tab_stop() {
        let mut state = group();
        assert_eq!(state.tab_stop().map(|id| id.as_str()), Some("s"));

        reducer(&mut state, RadioGroupAction::SetValue(Some(3)));
        assert_eq!(state.tab_stop().map(|id| id.as_str()), Some("l"));
    }
}
