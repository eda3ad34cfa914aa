//! The collection + active index + search query sub-state
//!
//! Shared by every primitive. Registration lives in [`crate::registry`],
//! type-ahead in [`crate::search`]; this module owns the struct and
//! navigation.

use crate::registry::{Item, ItemId};
use crate::resolver::{calculate_active_index, Focus};

/// Ordered items, the active index into them and the type-ahead query
#[derive(Clone, Debug, Default)]
pub struct Collection {
    pub(crate) items: Vec<Item>,
    pub(crate) active_index: Option<usize>,
    pub(crate) search_query: String,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered items in registration order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the active item.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// The active item, if any.
    pub fn active_item(&self) -> Option<&Item> {
        self.active_index.and_then(|idx| self.items.get(idx))
    }

    /// Id of the active item, if any.
    pub fn active_id(&self) -> Option<&ItemId> {
        self.active_item().map(|item| &item.id)
    }

    /// Current type-ahead query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Position of the item with the given id.
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Move the active index according to `focus`.
    ///
    /// Returns `false` when the index would not move and no search was in
    /// progress. Any actual navigation clears the search query.
    pub fn go_to(&mut self, focus: &Focus) -> bool {
        let next = calculate_active_index(focus, &self.items, self.active_index);
        if next == self.active_index && self.search_query.is_empty() {
            return false;
        }
        self.search_query.clear();
        self.active_index = next;
        true
    }

    /// Drop the active index without touching the query.
    pub(crate) fn deactivate(&mut self) -> bool {
        self.active_index.take().is_some()
    }
}
