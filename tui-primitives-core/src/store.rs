//! State container with the reducer pattern
//!
//! Each mounted primitive owns exactly one store. The reducer is the single
//! writer; renderers and the focus coordinator only read committed state.

use crate::Action;
use std::marker::PhantomData;

/// A reducer function that applies an action to a primitive's state
///
/// Returns `true` if the state changed. `false` means the transition was a
/// no-op (opening an open menu, clearing an empty query, ...) and nothing
/// downstream needs to re-render.
pub type Reducer<S, A> = fn(&mut S, A) -> bool;

/// Single-writer state container
///
/// # Example
/// ```
/// use tui_primitives_core::menu::{self, MenuAction, MenuState};
/// use tui_primitives_core::Store;
///
/// let mut store = Store::new(MenuState::default(), menu::reducer);
/// assert!(store.dispatch(MenuAction::OpenMenu));
/// assert!(!store.dispatch(MenuAction::OpenMenu));
/// assert!(store.state().is_open());
/// ```
pub struct Store<S, A: Action> {
    state: S,
    reducer: Reducer<S, A>,
    _marker: PhantomData<A>,
}

impl<S, A: Action> Store<S, A> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Dispatch an action to the store
    ///
    /// Returns `true` if the state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        (self.reducer)(&mut self.state, action)
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state
    ///
    /// Use this sparingly - prefer dispatching actions. Useful for seeding
    /// state in tests.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

impl<S: std::fmt::Debug, A: Action> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("state", &self.state).finish()
    }
}

/// Store with middleware support
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    store: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    /// Create a new store with middleware
    pub fn new(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Dispatch an action through middleware and store
    pub fn dispatch(&mut self, action: A) -> bool {
        self.middleware.before(&action);
        let changed = self.store.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

/// Middleware trait for intercepting actions
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that traces every transition
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Primitive name attached to every log line
    pub primitive: &'static str,
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log no-op transitions
    pub log_noops: bool,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new("primitive")
    }
}

impl LoggingMiddleware {
    /// Log changed transitions only
    pub fn new(primitive: &'static str) -> Self {
        Self {
            primitive,
            log_before: false,
            log_noops: false,
        }
    }

    /// Log before dispatch and every transition, including no-ops
    pub fn verbose(primitive: &'static str) -> Self {
        Self {
            primitive,
            log_before: true,
            log_noops: true,
        }
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::trace!(primitive = self.primitive, action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if state_changed || self.log_noops {
            tracing::debug!(
                primitive = self.primitive,
                action = %action.name(),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

/// Compose multiple middleware into a single middleware
pub struct ComposedMiddleware<A: Action> {
    middlewares: Vec<Box<dyn Middleware<A> + Send>>,
}

impl<A: Action> std::fmt::Debug for ComposedMiddleware<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<A: Action> Default for ComposedMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> ComposedMiddleware<A> {
    /// Create a new composed middleware
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the composition
    pub fn add<M: Middleware<A> + Send + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Builder-style [`add`](Self::add)
    pub fn with<M: Middleware<A> + Send + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }

    /// Number of composed middlewares
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether nothing is composed
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<A: Action> Middleware<A> for ComposedMiddleware<A> {
    fn before(&mut self, action: &A) {
        for middleware in &mut self.middlewares {
            middleware.before(action);
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        // Call in reverse order for proper nesting
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(action, state_changed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{self, MenuAction, MenuState};
    use crate::registry::{ItemData, ItemId};
    use crate::resolver::Focus;

    #[derive(Default)]
    struct CountingMiddleware {
        before_count: usize,
        changed_count: usize,
    }

    impl<A: Action> Middleware<A> for CountingMiddleware {
        fn before(&mut self, _action: &A) {
            self.before_count += 1;
        }

        fn after(&mut self, _action: &A, state_changed: bool) {
            if state_changed {
                self.changed_count += 1;
            }
        }
    }

    #[test]
    fn test_store_dispatch() {
        let mut store = Store::new(MenuState::default(), menu::reducer);

        assert!(store.dispatch(MenuAction::OpenMenu));
        assert!(store.state().is_open());
        assert!(store.dispatch(MenuAction::CloseMenu));
        assert!(!store.state().is_open());
    }

    #[test]
    fn test_store_state_mut() {
        let mut store = Store::new(MenuState::default(), menu::reducer);
        store.state_mut().open = crate::popup::OpenState::Open;
        assert!(!store.dispatch(MenuAction::OpenMenu));
    }

    #[test]
    fn test_store_with_middleware_counts_noops() {
        let mut store = StoreWithMiddleware::new(
            MenuState::default(),
            menu::reducer,
            CountingMiddleware::default(),
        );

        store.dispatch(MenuAction::RegisterItem {
            id: ItemId::from("a"),
            data: ItemData::text("A").into(),
        });
        store.dispatch(MenuAction::GoToItem(Focus::First));
        store.dispatch(MenuAction::GoToItem(Focus::First));

        assert_eq!(store.middleware().before_count, 3);
        assert_eq!(store.middleware().changed_count, 2);
    }

    #[test]
    fn test_composed_middleware() {
        let composed = ComposedMiddleware::<MenuAction>::new()
            .with(NoopMiddleware)
            .with(LoggingMiddleware::verbose("menu"));
        assert_eq!(composed.len(), 2);

        let mut store = StoreWithMiddleware::new(MenuState::default(), menu::reducer, composed);
        assert!(store.dispatch(MenuAction::OpenMenu));
    }
}
