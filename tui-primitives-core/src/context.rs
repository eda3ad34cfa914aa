//! Parent handles and item registrations
//!
//! A child part only exists under its parent. The parent hands out a
//! [`ParentHandle`]; constructing a part without one fails with
//! [`PrimitiveError::MissingParent`] pointing at the offending call.
//!
//! An [`ItemRegistration`] is the mounted item: creating it queues the
//! register action, dropping it queues the unregister action, and its
//! metadata setters write straight into the shared cell so the parent sees
//! them without a dispatch.

use tokio::sync::mpsc;

use crate::action::Action;
use crate::error::{PrimitiveError, Result};
use crate::listbox::{ListboxAction, OptionValue};
use crate::menu::MenuAction;
use crate::radio_group::RadioGroupAction;
use crate::registry::{ItemData, ItemDataRef, ItemId};

/// Handle given to child parts by their parent primitive
#[derive(Debug, Clone)]
pub struct ParentHandle<A> {
    name: &'static str,
    tx: mpsc::UnboundedSender<A>,
}

impl<A: Action> ParentHandle<A> {
    /// Handle for the primitive called `name` that receives actions on `tx`.
    pub fn new(name: &'static str, tx: mpsc::UnboundedSender<A>) -> Self {
        Self { name, tx }
    }

    /// Name of the parent primitive, e.g. `"Menu"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn send(&self, action: A) {
        if self.tx.send(action).is_err() {
            tracing::debug!(parent = self.name, "Parent gone; dropping action");
        }
    }
}

/// A mounted item. Unregisters itself when dropped.
#[derive(Debug)]
pub struct ItemRegistration<A: Action> {
    id: ItemId,
    data: ItemDataRef,
    parent: ParentHandle<A>,
    unregister: fn(ItemId) -> A,
}

impl<A: Action> ItemRegistration<A> {
    #[track_caller]
    fn mount(
        parent: Option<&ParentHandle<A>>,
        component: &'static str,
        parent_name: &'static str,
        id: ItemId,
        data: ItemDataRef,
        register: A,
        unregister: fn(ItemId) -> A,
    ) -> Result<Self> {
        let Some(parent) = parent else {
            return Err(PrimitiveError::missing_parent(component, parent_name));
        };
        parent.send(register);
        Ok(Self {
            id,
            data,
            parent: parent.clone(),
            unregister,
        })
    }

    /// The item's id.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// The shared metadata cell.
    pub fn data(&self) -> &ItemDataRef {
        &self.data
    }

    /// Update the disabled flag in place.
    pub fn set_disabled(&self, disabled: bool) {
        self.data.set_disabled(disabled);
    }

    /// Update the search text in place.
    pub fn set_text_value(&self, text: impl Into<String>) {
        self.data.set_text_value(Some(text.into()));
    }
}

impl<A: Action> Drop for ItemRegistration<A> {
    fn drop(&mut self) {
        self.parent.send((self.unregister)(self.id.clone()));
    }
}

impl ItemRegistration<MenuAction> {
    /// Mount a `Menu.Item`.
    #[track_caller]
    pub fn menu_item(
        parent: Option<&ParentHandle<MenuAction>>,
        id: impl Into<ItemId>,
        data: ItemData,
    ) -> Result<Self> {
        let id = id.into();
        let data = ItemDataRef::from(data);
        Self::mount(
            parent,
            "Menu.Item",
            "Menu",
            id.clone(),
            data.clone(),
            MenuAction::RegisterItem { id, data },
            MenuAction::UnregisterItem,
        )
    }
}

impl<V: OptionValue> ItemRegistration<ListboxAction<V>> {
    /// Mount a `Listbox.Option` carrying `value`.
    #[track_caller]
    pub fn listbox_option(
        parent: Option<&ParentHandle<ListboxAction<V>>>,
        id: impl Into<ItemId>,
        data: ItemData,
        value: V,
    ) -> Result<Self> {
        let id = id.into();
        let data = ItemDataRef::from(data);
        Self::mount(
            parent,
            "Listbox.Option",
            "Listbox",
            id.clone(),
            data.clone(),
            ListboxAction::RegisterOption { id, data, value },
            ListboxAction::UnregisterOption,
        )
    }
}

impl<V: OptionValue> ItemRegistration<RadioGroupAction<V>> {
    /// Mount a `RadioGroup.Option` carrying `value`.
    #[track_caller]
    pub fn radio_option(
        parent: Option<&ParentHandle<RadioGroupAction<V>>>,
        id: impl Into<ItemId>,
        data: ItemData,
        value: V,
    ) -> Result<Self> {
        let id = id.into();
        let data = ItemDataRef::from(data);
        Self::mount(
            parent,
            "RadioGroup.Option",
            "RadioGroup",
            id.clone(),
            data.clone(),
            RadioGroupAction::RegisterOption { id, data, value },
            RadioGroupAction::UnregisterOption,
        )
    }
}

/// Fail unless a parent handle is present; for parts that do not register
/// (buttons, surfaces, labels).
#[track_caller]
pub fn require_parent<'a, A: Action>(
    parent: Option<&'a ParentHandle<A>>,
    component: &'static str,
    parent_name: &'static str,
) -> Result<&'a ParentHandle<A>> {
    parent.ok_or_else(|| PrimitiveError::missing_parent(component, parent_name))
}
