//! Type-ahead search over a [`Collection`]

use std::time::Duration;

use crate::collection::Collection;

/// Idle time after which the accumulated query is cleared.
///
/// A query started after the reset scans from the item after the active one,
/// not from the first item; see [`Collection::search`].
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

impl Collection {
    /// Append a character to the query and activate the first matching item.
    ///
    /// Matching is a case-insensitive prefix test against each enabled item's
    /// text value. A fresh search starts at the item after the active one, so
    /// repeating a letter cycles through items sharing it; an ongoing search
    /// re-tests the active item first, so refining a prefix keeps it active.
    /// Without a match the query still grows and the active index stays.
    ///
    /// The query always changes, so this always returns `true`.
    pub fn search(&mut self, ch: char) -> bool {
        let was_searching = !self.search_query.is_empty();
        self.search_query.extend(ch.to_lowercase());

        let len = self.items.len();
        if len == 0 {
            return true;
        }

        let start = match self.active_index {
            Some(idx) if was_searching => idx,
            Some(idx) => idx + 1,
            None => 0,
        };

        let query = self.search_query.as_str();
        let found = (0..len).map(|offset| (start + offset) % len).find(|&idx| {
            let data = self.items[idx].data.read();
            !data.disabled
                && data
                    .text_value
                    .as_deref()
                    .is_some_and(|text| text.trim().to_lowercase().starts_with(query))
        });

        if let Some(idx) = found {
            self.active_index = Some(idx);
        }
        true
    }

    /// Reset the query.
    ///
    /// Returns `false` when there was nothing to clear.
    pub fn clear_search(&mut self) -> bool {
        if self.search_query.is_empty() {
            return false;
        }
        self.search_query.clear();
        true
    }
}
