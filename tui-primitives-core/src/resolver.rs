//! Active-index resolution
//!
//! A pure function from a navigation intent, the registered items and the
//! current active index to the next active index.

use serde::{Deserialize, Serialize};

use crate::registry::{Item, ItemId};

/// Navigation intent
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    /// First enabled item
    First,
    /// Previous enabled item, wrapping to the end
    Previous,
    /// Next enabled item, wrapping to the start
    Next,
    /// Last enabled item
    Last,
    /// A specific item by identity
    Specific(ItemId),
    /// No active item
    Nothing,
}

/// Compute the next active index.
///
/// Disabled items stay in the index space but are never returned, except that
/// `Specific` on a disabled or unknown item leaves `current` unchanged.
/// `Next`/`Previous` scan cyclically for at most `items.len()` steps and
/// behave as `First`/`Last` when nothing is active.
pub fn calculate_active_index(
    focus: &Focus,
    items: &[Item],
    current: Option<usize>,
) -> Option<usize> {
    let len = items.len();
    let current = current.filter(|&idx| idx < len);
    let enabled = |idx: &usize| !items[*idx].is_disabled();

    match focus {
        Focus::First => (0..len).find(enabled),
        Focus::Last => (0..len).rev().find(enabled),
        Focus::Next => match current {
            None => (0..len).find(enabled),
            Some(start) => (1..=len).map(|step| (start + step) % len).find(enabled),
        },
        Focus::Previous => match current {
            None => (0..len).rev().find(enabled),
            Some(start) => (1..=len)
                .map(|step| (start + len - step) % len)
                .find(enabled),
        },
        Focus::Specific(id) => match items.iter().position(|item| &item.id == id) {
            Some(idx) if enabled(&idx) => Some(idx),
            _ => current,
        },
        Focus::Nothing => None,
    }
}
