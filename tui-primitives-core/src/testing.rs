//! Test utilities for code built on tui-primitives
//!
//! - [`key`]: Create `KeyEvent` from string (e.g., `key("shift+tab")`)
//! - [`FakeHost`]: an in-memory [`Host`] with a containment tree and a focus log
//! - [`RecordingMiddleware`]: captures every dispatched action
//! - Assertion macros for verifying dispatched actions
//!
//! # Example
//!
//! ```ignore
//! use tui_primitives::testing::{key, FakeHost, RecordingMiddleware};
//!
//! let recorder = RecordingMiddleware::new();
//! let mut menu = PopupCoordinator::new(MenuState::default(), FakeHost::new());
//! menu.add_middleware(recorder.clone());
//!
//! menu.handle_event(PopupEvent::TriggerKey(key("down")));
//! assert_emitted!(recorder.actions(), MenuAction::OpenMenu);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use parking_lot::{Mutex, MutexGuard};

use crate::host::Host;
use crate::keybindings::parse_key_string;
use crate::registry::ItemId;
use crate::store::Middleware;
use crate::Action;

/// Create a `KeyEvent` from a key string.
///
/// # Examples
///
/// ```
/// use tui_primitives_core::testing::key;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let k = key("space");
/// assert_eq!(k.code, KeyCode::Char(' '));
///
/// let k = key("shift+tab");
/// assert_eq!(k.code, KeyCode::BackTab);
/// ```
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    parse_key_string(s).unwrap_or_else(|| panic!("Invalid key string: {:?}", s))
}

/// Create a `KeyEvent` for a character with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Create a `KeyEvent` for a character with Ctrl modifier.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Pause the tokio clock (current-thread runtime only).
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Resume the tokio clock.
#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Move the paused clock forward, letting due timers fire.
#[cfg(feature = "testing-time")]
pub async fn advance_time(duration: std::time::Duration) {
    tokio::time::advance(duration).await;
}

#[derive(Debug, Clone)]
struct FakeNode {
    parent: Option<String>,
    focusable: bool,
}

/// In-memory host: named nodes in a tree, a focus pointer and a focus log.
///
/// Unknown nodes are neither focusable nor contained in anything.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    nodes: HashMap<String, FakeNode>,
    focused: Option<String>,
    log: Vec<String>,
}

impl FakeHost {
    /// Empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent`.
    pub fn add_node(&mut self, id: &str, parent: Option<&str>, focusable: bool) -> &mut Self {
        self.nodes.insert(
            id.to_string(),
            FakeNode {
                parent: parent.map(str::to_string),
                focusable,
            },
        );
        self
    }

    /// Remove a node (its children become orphans).
    pub fn remove_node(&mut self, id: &str) {
        self.nodes.remove(id);
    }

    /// Currently focused node.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Every node focused so far, in order.
    pub fn focus_log(&self) -> Vec<String> {
        self.log.clone()
    }
}

impl Host for FakeHost {
    type Node = String;

    fn contains(&self, container: &String, target: &String) -> bool {
        let mut current = Some(target);
        while let Some(node) = current {
            if node == container {
                return self.nodes.contains_key(node);
            }
            current = self.nodes.get(node).and_then(|n| n.parent.as_ref());
        }
        false
    }

    fn is_focusable(&self, node: &String) -> bool {
        self.nodes.get(node).is_some_and(|n| n.focusable)
    }

    fn focus(&mut self, node: &String) {
        self.focused = Some(node.clone());
        self.log.push(node.clone());
    }

    fn item_node(&self, id: &ItemId) -> Option<String> {
        self.nodes
            .contains_key(id.as_str())
            .then(|| id.as_str().to_string())
    }
}

/// Middleware that records every action and whether it changed state.
///
/// Clones share one log, so keep a clone after handing one to a store.
#[derive(Debug)]
pub struct RecordingMiddleware<A> {
    log: Arc<Mutex<Vec<(A, bool)>>>,
}

impl<A> Clone for RecordingMiddleware<A> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<A> Default for RecordingMiddleware<A> {
    fn default() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<A: Action> RecordingMiddleware<A> {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(A, bool)>> {
        self.log.lock()
    }

    /// Every action dispatched so far.
    pub fn actions(&self) -> Vec<A> {
        self.lock().iter().map(|(action, _)| action.clone()).collect()
    }

    /// Only the actions that changed state.
    pub fn changed(&self) -> Vec<A> {
        self.lock()
            .iter()
            .filter(|(_, changed)| *changed)
            .map(|(action, _)| action.clone())
            .collect()
    }

    /// Names of every action dispatched so far.
    pub fn names(&self) -> Vec<&'static str> {
        self.lock().iter().map(|(action, _)| action.name()).collect()
    }

    /// Take and clear the log.
    pub fn drain(&self) -> Vec<A> {
        self.lock().drain(..).map(|(action, _)| action).collect()
    }
}

impl<A: Action> Middleware<A> for RecordingMiddleware<A> {
    fn before(&mut self, _action: &A) {}

    fn after(&mut self, action: &A, state_changed: bool) {
        self.lock().push((action.clone(), state_changed));
    }
}

/// Assert that a specific action was dispatched.
///
/// ```ignore
/// assert_emitted!(recorder.actions(), MenuAction::GoToItem(Focus::First));
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT dispatched.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find and return the first action matching a pattern.
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many actions match a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

/// Assert that an action of a specific category was dispatched.
///
/// This requires the action type to implement [`ActionCategory`](crate::ActionCategory).
#[macro_export]
macro_rules! assert_category_emitted {
    ($actions:expr, $category:expr) => {
        assert!(
            $actions.iter().any(|a| {
                use $crate::ActionCategory;
                a.category() == Some($category)
            }),
            "Expected action with category `{}` to be emitted, but got: {:?}",
            $category,
            $actions
        );
    };
}

/// Count how many actions belong to a specific category.
#[macro_export]
macro_rules! count_category {
    ($actions:expr, $category:expr) => {{
        use $crate::ActionCategory;
        $actions
            .iter()
            .filter(|a| a.category() == Some($category))
            .count()
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{self, MenuAction, MenuState};
    use crate::resolver::Focus;
    use crate::store::StoreWithMiddleware;

    #[test]
    fn test_key_helpers() {
        assert_eq!(key("space").code, KeyCode::Char(' '));
        assert_eq!(key("esc").code, KeyCode::Esc);
        assert_eq!(char_key('x').modifiers, KeyModifiers::empty());
        assert!(ctrl_key('c').modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn test_fake_host_containment() {
        let mut host = FakeHost::new();
        host.add_node("root", None, false)
            .add_node("menu", Some("root"), true)
            .add_node("item", Some("menu"), false);

        assert!(host.contains(&"menu".into(), &"item".into()));
        assert!(host.contains(&"menu".into(), &"menu".into()));
        assert!(!host.contains(&"item".into(), &"menu".into()));
        assert!(!host.contains(&"ghost".into(), &"ghost".into()));
        assert!(host.is_focusable(&"menu".into()));
        assert!(!host.is_focusable(&"ghost".into()));
    }

    #[test]
    fn test_fake_host_focus_log() {
        let mut host = FakeHost::new();
        host.focus(&"a".to_string());
        host.focus(&"b".to_string());
        assert_eq!(host.focused(), Some("b"));
        assert_eq!(host.focus_log(), vec!["a", "b"]);
    }

    #[test]
    fn test_recording_middleware() {
        let recorder = RecordingMiddleware::new();
        let mut store =
            StoreWithMiddleware::new(MenuState::default(), menu::reducer, recorder.clone());

        store.dispatch(MenuAction::OpenMenu);
        store.dispatch(MenuAction::OpenMenu);
        store.dispatch(MenuAction::GoToItem(Focus::Nothing));

        assert_eq!(recorder.names(), vec!["OpenMenu", "OpenMenu", "GoToItem"]);
        assert_eq!(recorder.changed().len(), 1);

        let actions = recorder.drain();
        assert_emitted!(actions, MenuAction::OpenMenu);
        assert_not_emitted!(actions, MenuAction::CloseMenu);
        assert!(find_emitted!(actions, MenuAction::GoToItem(_)).is_some());
        assert_eq!(count_emitted!(actions, MenuAction::OpenMenu), 2);
        assert_category_emitted!(actions, "visibility");
        assert_eq!(count_category!(actions, "navigation"), 1);
        assert!(recorder.actions().is_empty());
    }
}
