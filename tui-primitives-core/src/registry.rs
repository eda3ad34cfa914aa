//! Item registry: identities plus the shared metadata side-channel
//!
//! Every interactive item (menu item, listbox option, radio option) is
//! registered with a stable [`ItemId`] and an [`ItemDataRef`]. The data cell is
//! written by the item itself whenever its disabled flag or text changes and is
//! read by the resolver and the search accumulator at decision time.
//!
//! Metadata writes are not ordered against reducer transitions. A resolver that
//! runs right after an item was disabled sees the new flag; one that ran before
//! does not get re-run. This relaxation keeps metadata churn out of the reducer.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;

/// Stable identity of a registered item
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new item id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Metadata an item publishes about itself
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemData {
    /// Disabled items are never activated by navigation or search
    pub disabled: bool,
    /// Text matched by type-ahead search
    pub text_value: Option<String>,
}

impl ItemData {
    /// Enabled item with the given search text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            disabled: false,
            text_value: Some(text.into()),
        }
    }

    /// Mark the item as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Shared, mutably aliased handle to an item's [`ItemData`]
///
/// Cloning the handle aliases the same cell. The registry keeps one clone,
/// the item that registered keeps another and writes through it.
#[derive(Clone, Debug, Default)]
pub struct ItemDataRef(Arc<RwLock<ItemData>>);

impl ItemDataRef {
    /// Wrap item data in a fresh shared cell.
    pub fn new(data: ItemData) -> Self {
        Self(Arc::new(RwLock::new(data)))
    }

    /// Read the current metadata.
    pub fn read(&self) -> RwLockReadGuard<'_, ItemData> {
        self.0.read()
    }

    fn write(&self) -> RwLockWriteGuard<'_, ItemData> {
        self.0.write()
    }

    /// Whether the item is currently disabled.
    pub fn is_disabled(&self) -> bool {
        self.read().disabled
    }

    /// Update the disabled flag in place.
    pub fn set_disabled(&self, disabled: bool) {
        self.write().disabled = disabled;
    }

    /// Update the search text in place.
    pub fn set_text_value(&self, text: Option<String>) {
        self.write().text_value = text;
    }

    /// Whether two handles alias the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ItemData> for ItemDataRef {
    fn from(data: ItemData) -> Self {
        Self::new(data)
    }
}

/// A registered item
#[derive(Clone, Debug)]
pub struct Item {
    /// Stable identity
    pub id: ItemId,
    /// Shared metadata cell
    pub data: ItemDataRef,
}

impl Item {
    /// Create an item from an id and a metadata handle.
    pub fn new(id: impl Into<ItemId>, data: impl Into<ItemDataRef>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }

    /// Whether the item is currently disabled.
    pub fn is_disabled(&self) -> bool {
        self.data.is_disabled()
    }
}

impl Collection {
    /// Append an item.
    ///
    /// Returns `false` without touching the collection when an item with the
    /// same id is already registered.
    pub fn register(&mut self, id: ItemId, data: ItemDataRef) -> bool {
        if self.index_of(&id).is_some() {
            tracing::warn!(item = %id, "Item registered twice; ignoring");
            return false;
        }
        self.items.push(Item { id, data });
        true
    }

    /// Remove the item with the given id.
    ///
    /// The active index keeps pointing at the same logical item. If the
    /// removed item was the active one, nothing is active afterwards.
    /// Returns `false` when no such item exists.
    pub fn unregister(&mut self, id: &ItemId) -> bool {
        let Some(removed) = self.index_of(id) else {
            return false;
        };

        let active_id = self
            .active_index
            .and_then(|idx| self.items.get(idx))
            .map(|item| item.id.clone());

        self.items.remove(removed);

        self.active_index = match active_id {
            Some(active) if &active == id => None,
            Some(active) => self.index_of(&active),
            None => None,
        };
        true
    }

    /// Reorder items by a caller-supplied key, keeping the active item.
    ///
    /// Binding layers use this to restore presentation order after an item
    /// remounted and was appended at the end.
    pub fn sort_by_key<K, F>(&mut self, mut key: F) -> bool
    where
        K: Ord,
        F: FnMut(&Item) -> K,
    {
        let before: Vec<ItemId> = self.items.iter().map(|item| item.id.clone()).collect();
        let active_id = self.active_item().map(|item| item.id.clone());

        self.items.sort_by_key(|item| key(item));

        let changed = self
            .items
            .iter()
            .map(|item| &item.id)
            .ne(before.iter());
        if changed {
            self.active_index = active_id.and_then(|id| self.index_of(&id));
        }
        changed
    }
}
