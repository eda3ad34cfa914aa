//! Accessibility attributes derived from committed state
//!
//! Renderers receive these instead of the raw state. Field names serialize to
//! the exact WAI-ARIA attribute names; absent attributes are skipped.

use bitflags::bitflags;
use serde::Serialize;

use crate::listbox::{ListboxState, OptionValue};
use crate::menu::MenuState;
use crate::radio_group::RadioGroupState;
use crate::registry::ItemId;

bitflags! {
    /// Per-item render state handed to item renderers
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemState: u8 {
        /// Keyboard-highlighted
        const ACTIVE = 1 << 0;
        /// Not interactive
        const DISABLED = 1 << 1;
        /// Holds the committed value
        const SELECTED = 1 << 2;
    }
}

/// Element ids of a primitive's parts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartIds {
    /// Trigger element id
    pub trigger: String,
    /// Popup surface (or group) element id
    pub surface: String,
}

impl PartIds {
    /// Derive part ids from a base id: `<base>-button` and `<base>-items`.
    pub fn new(base: &str) -> Self {
        Self {
            trigger: format!("{base}-button"),
            surface: format!("{base}-items"),
        }
    }
}

/// Attributes of the trigger control
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TriggerAttributes {
    pub id: String,
    #[serde(rename = "aria-haspopup")]
    pub aria_haspopup: &'static str,
    #[serde(rename = "aria-expanded")]
    pub aria_expanded: bool,
    #[serde(rename = "aria-controls", skip_serializing_if = "Option::is_none")]
    pub aria_controls: Option<String>,
    #[serde(rename = "aria-disabled", skip_serializing_if = "Option::is_none")]
    pub aria_disabled: Option<bool>,
}

/// Attributes of the popup surface or group container
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SurfaceAttributes {
    pub id: String,
    pub role: &'static str,
    #[serde(rename = "aria-activedescendant", skip_serializing_if = "Option::is_none")]
    pub aria_activedescendant: Option<String>,
    #[serde(rename = "aria-labelledby", skip_serializing_if = "Option::is_none")]
    pub aria_labelledby: Option<String>,
    #[serde(rename = "aria-orientation", skip_serializing_if = "Option::is_none")]
    pub aria_orientation: Option<&'static str>,
    #[serde(rename = "aria-disabled", skip_serializing_if = "Option::is_none")]
    pub aria_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabindex: Option<i32>,
}

/// Attributes of a single item
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemAttributes {
    pub id: String,
    pub role: &'static str,
    pub tabindex: i32,
    #[serde(rename = "aria-disabled", skip_serializing_if = "Option::is_none")]
    pub aria_disabled: Option<bool>,
    #[serde(rename = "aria-selected", skip_serializing_if = "Option::is_none")]
    pub aria_selected: Option<bool>,
    #[serde(rename = "aria-checked", skip_serializing_if = "Option::is_none")]
    pub aria_checked: Option<bool>,
    /// Render props; not an attribute
    #[serde(skip)]
    pub state: ItemState,
}

/// Flatten any attribute struct into `(name, value)` pairs.
pub fn attribute_pairs<T: Serialize>(attributes: &T) -> Vec<(String, String)> {
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(attributes) else {
        return Vec::new();
    };
    map.into_iter()
        .map(|(name, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect()
}

fn disabled_flag(disabled: bool) -> Option<bool> {
    disabled.then_some(true)
}

/// Menu trigger attributes.
pub fn menu_trigger(state: &MenuState, ids: &PartIds) -> TriggerAttributes {
    TriggerAttributes {
        id: ids.trigger.clone(),
        aria_haspopup: "menu",
        aria_expanded: state.is_open(),
        aria_controls: state.is_open().then(|| ids.surface.clone()),
        aria_disabled: None,
    }
}

/// Menu surface attributes.
pub fn menu_surface(state: &MenuState, ids: &PartIds) -> SurfaceAttributes {
    SurfaceAttributes {
        id: ids.surface.clone(),
        role: "menu",
        aria_activedescendant: state.collection.active_id().map(ToString::to_string),
        aria_labelledby: Some(ids.trigger.clone()),
        aria_orientation: None,
        aria_disabled: None,
        tabindex: Some(0),
    }
}

/// Menu item attributes; `None` for an unregistered id.
pub fn menu_item(state: &MenuState, id: &ItemId) -> Option<ItemAttributes> {
    let item = state.collection.get(id)?;
    let disabled = item.is_disabled();
    let mut flags = ItemState::empty();
    flags.set(ItemState::ACTIVE, state.collection.active_id() == Some(id));
    flags.set(ItemState::DISABLED, disabled);

    Some(ItemAttributes {
        id: id.to_string(),
        role: "menuitem",
        tabindex: -1,
        aria_disabled: disabled_flag(disabled),
        aria_selected: None,
        aria_checked: None,
        state: flags,
    })
}

/// Listbox trigger attributes.
pub fn listbox_trigger<V: OptionValue>(
    state: &ListboxState<V>,
    ids: &PartIds,
) -> TriggerAttributes {
    TriggerAttributes {
        id: ids.trigger.clone(),
        aria_haspopup: "listbox",
        aria_expanded: state.is_open(),
        aria_controls: state.is_open().then(|| ids.surface.clone()),
        aria_disabled: disabled_flag(state.disabled),
    }
}

/// Listbox surface attributes.
pub fn listbox_surface<V: OptionValue>(
    state: &ListboxState<V>,
    ids: &PartIds,
) -> SurfaceAttributes {
    SurfaceAttributes {
        id: ids.surface.clone(),
        role: "listbox",
        aria_activedescendant: state.collection.active_id().map(ToString::to_string),
        aria_labelledby: Some(ids.trigger.clone()),
        aria_orientation: Some("vertical"),
        aria_disabled: None,
        tabindex: Some(0),
    }
}

/// Listbox option attributes; `None` for an unregistered id.
pub fn listbox_option<V: OptionValue>(
    state: &ListboxState<V>,
    id: &ItemId,
) -> Option<ItemAttributes> {
    let item = state.collection.get(id)?;
    let disabled = item.is_disabled();
    let selected = state.is_selected(id);
    let mut flags = ItemState::empty();
    flags.set(ItemState::ACTIVE, state.collection.active_id() == Some(id));
    flags.set(ItemState::DISABLED, disabled);
    flags.set(ItemState::SELECTED, selected);

    Some(ItemAttributes {
        id: id.to_string(),
        role: "option",
        tabindex: -1,
        aria_disabled: disabled_flag(disabled),
        aria_selected: Some(selected),
        aria_checked: None,
        state: flags,
    })
}

/// Radio group container attributes.
pub fn radio_group<V: OptionValue>(
    state: &RadioGroupState<V>,
    id: &str,
    labelledby: Option<&str>,
) -> SurfaceAttributes {
    SurfaceAttributes {
        id: id.to_string(),
        role: "radiogroup",
        aria_activedescendant: None,
        aria_labelledby: labelledby.map(str::to_string),
        aria_orientation: None,
        aria_disabled: disabled_flag(state.disabled),
        tabindex: None,
    }
}

/// Radio option attributes with roving tabindex; `None` for an unregistered id.
pub fn radio_option<V: OptionValue>(
    state: &RadioGroupState<V>,
    id: &ItemId,
) -> Option<ItemAttributes> {
    let item = state.collection.get(id)?;
    let disabled = item.is_disabled() || state.disabled;
    let checked = state.is_checked(id);
    let mut flags = ItemState::empty();
    flags.set(ItemState::ACTIVE, state.collection.active_id() == Some(id));
    flags.set(ItemState::DISABLED, disabled);
    flags.set(ItemState::SELECTED, checked);

    Some(ItemAttributes {
        id: id.to_string(),
        role: "radio",
        tabindex: if state.tab_stop() == Some(id) { 0 } else { -1 },
        aria_disabled: disabled_flag(disabled),
        aria_selected: None,
        aria_checked: Some(checked),
        state: flags,
    })
}
