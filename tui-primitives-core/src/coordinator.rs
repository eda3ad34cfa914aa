//! Focus and pointer coordination
//!
//! The reducers know nothing about focus, keys or pointers. A coordinator
//! sits between the host and one primitive's store: it maps input to actions,
//! moves focus through the [`Host`], closes on outside clicks and schedules
//! the work that has to wait a frame (focusing a surface that is only about
//! to appear) or a while (resetting the type-ahead query).
//!
//! Deferred work comes back as [`Deferred`] messages. A host loop feeds them
//! in with [`PopupCoordinator::process_pending`] or awaits them with
//! [`PopupCoordinator::next_deferred`]. Anything that schedules work must run
//! inside a tokio runtime.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::PrimitiveConfig;
use crate::context::ParentHandle;
use crate::effect::{DispatchResult, EffectStore};
use crate::event::{Outcome, PopupEvent, RadioEvent};
use crate::host::Host;
use crate::keybindings::{commands, KeyContext};
use crate::listbox::OptionValue;
use crate::popup::{PopupIntent, PopupState};
use crate::radio_group::{self, RadioGroupAction, RadioGroupEffect, RadioGroupState};
use crate::registry::ItemId;
use crate::resolver::Focus;
use crate::scheduler::{Scheduler, TaskKey};
use crate::store::{ComposedMiddleware, LoggingMiddleware, Middleware};

const FOCUS_TASK: &str = "focus";
const SEARCH_TASK: &str = "search";

/// Work delivered back to the coordinator after a delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Focus the surface, then navigate if a target is given
    FocusSurface(Option<Focus>),
    /// Return focus to the trigger
    FocusTrigger,
    /// The type-ahead query went idle
    ClearSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    OpenFirst,
    OpenLast,
    Next,
    Previous,
    First,
    Last,
    Activate,
    Close,
    TrapFocus,
    Select,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            commands::OPEN_FIRST => Self::OpenFirst,
            commands::OPEN_LAST => Self::OpenLast,
            commands::NEXT => Self::Next,
            commands::PREVIOUS => Self::Previous,
            commands::FIRST => Self::First,
            commands::LAST => Self::Last,
            commands::ACTIVATE => Self::Activate,
            commands::CLOSE => Self::Close,
            commands::TRAP_FOCUS => Self::TrapFocus,
            commands::SELECT => Self::Select,
            _ => return None,
        })
    }
}

fn command(config: &PrimitiveConfig, key: KeyEvent, context: KeyContext) -> Option<Command> {
    config
        .keybindings
        .get_command(key, context)
        .and_then(Command::from_name)
}

/// Printable character a key would type, ignoring chords.
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

type PopupStore<S> = EffectStore<
    S,
    <S as PopupState>::Action,
    <S as PopupState>::Effect,
    ComposedMiddleware<<S as PopupState>::Action>,
>;

type Callback = Box<dyn FnMut() + Send>;

/// Drives a Menu or Listbox: trigger, surface and items.
pub struct PopupCoordinator<S: PopupState, H: Host> {
    store: PopupStore<S>,
    host: H,
    trigger: Option<H::Node>,
    surface: Option<H::Node>,
    config: PrimitiveConfig,
    scheduler: Scheduler<Deferred>,
    deferred_rx: mpsc::UnboundedReceiver<Deferred>,
    /// When the current type-ahead query goes idle
    search_idle_at: Option<Instant>,
    actions_tx: mpsc::UnboundedSender<S::Action>,
    actions_rx: mpsc::UnboundedReceiver<S::Action>,
    callbacks: HashMap<ItemId, Callback>,
}

impl<S: PopupState, H: Host> PopupCoordinator<S, H> {
    /// Coordinator with the default config.
    pub fn new(state: S, host: H) -> Self {
        Self::with_config(state, host, PrimitiveConfig::default())
    }

    /// Coordinator with an explicit config.
    pub fn with_config(state: S, host: H, config: PrimitiveConfig) -> Self {
        let middleware = ComposedMiddleware::new().with(LoggingMiddleware::new(S::NAME));
        let (deferred_tx, deferred_rx) = mpsc::unbounded_channel();
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            store: EffectStore::with_middleware(state, S::reducer(), middleware),
            host,
            trigger: None,
            surface: None,
            config,
            scheduler: Scheduler::new(deferred_tx),
            deferred_rx,
            search_idle_at: None,
            actions_tx,
            actions_rx,
            callbacks: HashMap::new(),
        }
    }

    /// Append a middleware after the logging one.
    pub fn add_middleware<M>(&mut self, middleware: M)
    where
        M: Middleware<S::Action> + Send + 'static,
    {
        self.store.middleware_mut().add(middleware);
    }

    /// Committed state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably (to update layout).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active configuration.
    pub fn config(&self) -> &PrimitiveConfig {
        &self.config
    }

    /// Attach or detach the trigger widget.
    pub fn set_trigger(&mut self, node: Option<H::Node>) {
        self.trigger = node;
    }

    /// Attach or detach the surface widget.
    pub fn set_surface(&mut self, node: Option<H::Node>) {
        self.surface = node;
    }

    /// Handle for mounting child parts.
    pub fn handle(&self) -> ParentHandle<S::Action> {
        ParentHandle::new(S::NAME, self.actions_tx.clone())
    }

    /// Run `callback` when the item is activated.
    pub fn on_activate(&mut self, id: impl Into<ItemId>, callback: impl FnMut() + Send + 'static) {
        self.callbacks.insert(id.into(), Box::new(callback));
    }

    /// Forget an item's activation callback.
    pub fn remove_callback(&mut self, id: &ItemId) -> bool {
        self.callbacks.remove(id).is_some()
    }

    /// Dispatch an action directly (controlled updates, registration).
    pub fn dispatch(&mut self, action: S::Action) -> DispatchResult<S::Effect> {
        self.store.dispatch(action)
    }

    /// Whether deferred work of the given kind is waiting.
    pub fn is_pending(&self, key: &str) -> bool {
        self.scheduler.is_pending(&TaskKey::new(key))
    }

    /// Apply queued registrations and any deferred work already delivered.
    pub fn process_pending(&mut self) -> Outcome<S::Effect> {
        let mut outcome = Outcome::ignored();
        self.drain_registrations(&mut outcome);
        while let Ok(deferred) = self.deferred_rx.try_recv() {
            self.apply_deferred(deferred, &mut outcome);
        }
        outcome
    }

    /// Wait for the next deferred message and apply it.
    pub async fn next_deferred(&mut self) -> Option<Deferred> {
        let deferred = self.deferred_rx.recv().await?;
        self.on_deferred(deferred.clone());
        Some(deferred)
    }

    /// Apply one deferred message.
    pub fn on_deferred(&mut self, deferred: Deferred) -> Outcome<S::Effect> {
        let mut outcome = Outcome::ignored();
        self.drain_registrations(&mut outcome);
        self.apply_deferred(deferred, &mut outcome);
        outcome
    }

    /// Handle one input event.
    pub fn handle_event(&mut self, event: PopupEvent<H::Node>) -> Outcome<S::Effect> {
        let mut outcome = Outcome::ignored();
        self.drain_registrations(&mut outcome);

        match event {
            PopupEvent::TriggerKey(key) => self.trigger_key(key, &mut outcome),
            PopupEvent::TriggerClick => self.trigger_click(&mut outcome),
            PopupEvent::SurfaceKey(key) => self.surface_key(key, &mut outcome),
            PopupEvent::ItemClick(id) => self.item_click(id, &mut outcome),
            PopupEvent::ItemPointerMove(id) => self.pointer_move(id, &mut outcome),
            PopupEvent::ItemPointerLeave(id) => self.pointer_leave(id, &mut outcome),
            PopupEvent::PointerDown(target) => self.pointer_down(target, &mut outcome),
        }
        outcome
    }

    fn apply(&mut self, intent: PopupIntent, outcome: &mut Outcome<S::Effect>) {
        let Some(action) = S::action(intent) else {
            return;
        };
        let result = self.store.dispatch(action);
        outcome.absorb(result.changed, result.effects);
    }

    fn drain_registrations(&mut self, outcome: &mut Outcome<S::Effect>) {
        while let Ok(action) = self.actions_rx.try_recv() {
            let result = self.store.dispatch(action);
            outcome.absorb(result.changed, result.effects);
        }
    }

    fn schedule_focus(&mut self, deferred: Deferred) {
        let delay = self.config.frame_delay;
        self.scheduler.after(FOCUS_TASK, delay, deferred);
    }

    fn is_open(&self) -> bool {
        self.store.state().is_open()
    }

    fn item_enabled(&self, id: &ItemId) -> bool {
        self.store
            .state()
            .collection()
            .get(id)
            .is_some_and(|item| !item.is_disabled())
    }

    fn focus_trigger_now(&mut self) {
        match &self.trigger {
            Some(trigger) => self.host.focus(trigger),
            None => tracing::trace!(primitive = S::NAME, "No trigger to focus"),
        }
    }

    fn open_with(&mut self, requested: Focus, outcome: &mut Outcome<S::Effect>) {
        outcome.consumed = true;
        if self.store.state().is_disabled() {
            return;
        }
        self.apply(PopupIntent::Open, outcome);
        let target = self.store.state().opening_focus(requested);
        self.schedule_focus(Deferred::FocusSurface(Some(target)));
    }

    fn close(&mut self, outcome: &mut Outcome<S::Effect>) {
        self.apply(PopupIntent::Close, outcome);
        self.scheduler.cancel(&TaskKey::new(FOCUS_TASK));
    }

    fn close_and_restore(&mut self, outcome: &mut Outcome<S::Effect>) {
        self.close(outcome);
        self.schedule_focus(Deferred::FocusTrigger);
    }

    fn search(&mut self, ch: char, outcome: &mut Outcome<S::Effect>) {
        outcome.consumed = true;
        let now = Instant::now();
        // The reset may be queued but not yet applied; an expired query never grows.
        if self.search_idle_at.is_some_and(|idle_at| now >= idle_at) {
            self.clear_search(outcome);
        }
        self.apply(PopupIntent::Search(ch), outcome);
        let debounce = self.config.search_debounce;
        self.search_idle_at = Some(now + debounce);
        self.scheduler
            .after(SEARCH_TASK, debounce, Deferred::ClearSearch);
    }

    fn clear_search(&mut self, outcome: &mut Outcome<S::Effect>) {
        self.search_idle_at = None;
        self.apply(PopupIntent::ClearSearch, outcome);
    }

    fn activate(&mut self, id: Option<ItemId>, outcome: &mut Outcome<S::Effect>) {
        outcome.consumed = true;
        if let Some(id) = &id {
            tracing::debug!(primitive = S::NAME, item = %id, "Activating item");
            self.apply(PopupIntent::Activate(id.clone()), outcome);
        }
        self.close(outcome);
        if let Some(callback) = id.as_ref().and_then(|id| self.callbacks.get_mut(id)) {
            callback();
        }
        self.schedule_focus(Deferred::FocusTrigger);
    }

    fn trigger_key(&mut self, key: KeyEvent, outcome: &mut Outcome<S::Effect>) {
        match command(&self.config, key, KeyContext::Trigger) {
            Some(Command::OpenFirst) => self.open_with(Focus::First, outcome),
            Some(Command::OpenLast) => self.open_with(Focus::Last, outcome),
            _ => {}
        }
    }

    fn trigger_click(&mut self, outcome: &mut Outcome<S::Effect>) {
        if self.store.state().is_disabled() {
            return;
        }
        outcome.consumed = true;
        if self.is_open() {
            self.close_and_restore(outcome);
        } else {
            self.apply(PopupIntent::Open, outcome);
            self.schedule_focus(Deferred::FocusSurface(None));
        }
    }

    fn surface_key(&mut self, key: KeyEvent, outcome: &mut Outcome<S::Effect>) {
        if !self.is_open() {
            return;
        }

        let searching = !self.store.state().collection().search_query().is_empty();
        if searching && typed_char(&key) == Some(' ') {
            self.search(' ', outcome);
            return;
        }

        let navigate = |focus| PopupIntent::GoTo(focus);
        match command(&self.config, key, KeyContext::Surface) {
            Some(Command::Next) => self.apply(navigate(Focus::Next), outcome),
            Some(Command::Previous) => self.apply(navigate(Focus::Previous), outcome),
            Some(Command::First) => self.apply(navigate(Focus::First), outcome),
            Some(Command::Last) => self.apply(navigate(Focus::Last), outcome),
            Some(Command::Activate) => {
                let active = self.store.state().collection().active_id().cloned();
                self.activate(active, outcome);
            }
            Some(Command::Close) => self.close_and_restore(outcome),
            Some(Command::TrapFocus) => {}
            _ => match typed_char(&key) {
                Some(ch) => self.search(ch, outcome),
                None => return,
            },
        }
        outcome.consumed = true;
    }

    fn item_click(&mut self, id: ItemId, outcome: &mut Outcome<S::Effect>) {
        if !self.item_enabled(&id) {
            tracing::trace!(primitive = S::NAME, item = %id, "Ignoring click on disabled item");
            return;
        }
        self.activate(Some(id), outcome);
    }

    fn pointer_move(&mut self, id: ItemId, outcome: &mut Outcome<S::Effect>) {
        if !self.is_open() || !self.item_enabled(&id) {
            return;
        }
        if self.store.state().collection().active_id() == Some(&id) {
            return;
        }
        self.apply(PopupIntent::GoTo(Focus::Specific(id)), outcome);
    }

    fn pointer_leave(&mut self, id: ItemId, outcome: &mut Outcome<S::Effect>) {
        if !self.is_open() || !self.item_enabled(&id) {
            return;
        }
        if self.store.state().collection().active_id() != Some(&id) {
            return;
        }
        self.apply(PopupIntent::GoTo(Focus::Nothing), outcome);
    }

    fn pointer_down(&mut self, target: H::Node, outcome: &mut Outcome<S::Effect>) {
        if !self.is_open() {
            return;
        }
        let inside = [self.trigger.as_ref(), self.surface.as_ref()]
            .into_iter()
            .flatten()
            .any(|node| self.host.contains(node, &target));
        if inside {
            return;
        }

        tracing::debug!(primitive = S::NAME, ?target, "Pointer down outside; closing");
        self.close(outcome);
        if !self.host.is_focusable(&target) {
            outcome.consumed = true;
            self.focus_trigger_now();
        }
    }

    fn apply_deferred(&mut self, deferred: Deferred, outcome: &mut Outcome<S::Effect>) {
        tracing::trace!(primitive = S::NAME, ?deferred, "Running deferred work");
        match deferred {
            Deferred::FocusSurface(then) => {
                if !self.is_open() {
                    return;
                }
                if let Some(surface) = &self.surface {
                    self.host.focus(surface);
                }
                if let Some(focus) = then {
                    self.apply(PopupIntent::GoTo(focus), outcome);
                }
            }
            Deferred::FocusTrigger => self.focus_trigger_now(),
            Deferred::ClearSearch => {
                let stale = self
                    .search_idle_at
                    .is_some_and(|idle_at| Instant::now() < idle_at);
                if stale {
                    tracing::trace!(primitive = S::NAME, "Ignoring reset of a superseded query");
                    return;
                }
                self.clear_search(outcome);
            }
        }
    }
}

type RadioStore<V> = EffectStore<
    RadioGroupState<V>,
    RadioGroupAction<V>,
    RadioGroupEffect<V>,
    ComposedMiddleware<RadioGroupAction<V>>,
>;

/// Drives a RadioGroup: roving focus that follows the checked option.
pub struct RadioGroupController<V: OptionValue, H: Host> {
    store: RadioStore<V>,
    host: H,
    config: PrimitiveConfig,
    actions_tx: mpsc::UnboundedSender<RadioGroupAction<V>>,
    actions_rx: mpsc::UnboundedReceiver<RadioGroupAction<V>>,
}

impl<V: OptionValue, H: Host> RadioGroupController<V, H> {
    /// Controller with the default config.
    pub fn new(state: RadioGroupState<V>, host: H) -> Self {
        Self::with_config(state, host, PrimitiveConfig::default())
    }

    /// Controller with an explicit config.
    pub fn with_config(state: RadioGroupState<V>, host: H, config: PrimitiveConfig) -> Self {
        let middleware = ComposedMiddleware::new().with(LoggingMiddleware::new("RadioGroup"));
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            store: EffectStore::with_middleware(state, radio_group::reducer::<V>, middleware),
            host,
            config,
            actions_tx,
            actions_rx,
        }
    }

    /// Append a middleware after the logging one.
    pub fn add_middleware<M>(&mut self, middleware: M)
    where
        M: Middleware<RadioGroupAction<V>> + Send + 'static,
    {
        self.store.middleware_mut().add(middleware);
    }

    /// Committed state.
    pub fn state(&self) -> &RadioGroupState<V> {
        self.store.state()
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handle for mounting options.
    pub fn handle(&self) -> ParentHandle<RadioGroupAction<V>> {
        ParentHandle::new("RadioGroup", self.actions_tx.clone())
    }

    /// Dispatch an action directly.
    pub fn dispatch(&mut self, action: RadioGroupAction<V>) -> DispatchResult<RadioGroupEffect<V>> {
        self.store.dispatch(action)
    }

    /// Apply queued registrations.
    pub fn process_pending(&mut self) -> Outcome<RadioGroupEffect<V>> {
        let mut outcome = Outcome::ignored();
        self.drain_registrations(&mut outcome);
        outcome
    }

    /// Handle one input event.
    pub fn handle_event(&mut self, event: RadioEvent) -> Outcome<RadioGroupEffect<V>> {
        let mut outcome = Outcome::ignored();
        self.drain_registrations(&mut outcome);

        match event {
            RadioEvent::Key(key) => match command(&self.config, key, KeyContext::Radio) {
                Some(Command::Next) => self.step(Focus::Next, &mut outcome),
                Some(Command::Previous) => self.step(Focus::Previous, &mut outcome),
                Some(Command::Select) => {
                    outcome.consumed = true;
                    if let Some(id) = self.store.state().collection.active_id().cloned() {
                        self.select(id, &mut outcome);
                    }
                }
                _ => {}
            },
            RadioEvent::Click(id) => self.select(id, &mut outcome),
            RadioEvent::Focus(id) => {
                let result = self.store.dispatch(RadioGroupAction::GoToOption(Focus::Specific(id)));
                outcome.absorb(result.changed, result.effects);
            }
        }
        outcome
    }

    fn drain_registrations(&mut self, outcome: &mut Outcome<RadioGroupEffect<V>>) {
        while let Ok(action) = self.actions_rx.try_recv() {
            let result = self.store.dispatch(action);
            outcome.absorb(result.changed, result.effects);
        }
    }

    fn step(&mut self, focus: Focus, outcome: &mut Outcome<RadioGroupEffect<V>>) {
        outcome.consumed = true;
        let state = self.store.state();
        if state.disabled {
            return;
        }
        if state.collection.active_index().is_none() {
            if let Some(stop) = state.tab_stop().cloned() {
                let seeded = self
                    .store
                    .dispatch(RadioGroupAction::GoToOption(Focus::Specific(stop)));
                outcome.absorb(seeded.changed, seeded.effects);
            }
        }
        let moved = self.store.dispatch(RadioGroupAction::GoToOption(focus));
        outcome.absorb(moved.changed, moved.effects);
        if let Some(id) = self.store.state().collection.active_id().cloned() {
            self.select(id, outcome);
        }
    }

    fn select(&mut self, id: ItemId, outcome: &mut Outcome<RadioGroupEffect<V>>) {
        outcome.consumed = true;
        let result = self.store.dispatch(RadioGroupAction::Select(id.clone()));
        outcome.absorb(result.changed, result.effects);
        if self.store.state().collection.active_id() != Some(&id) {
            return;
        }
        if let Some(node) = self.host.item_node(&id) {
            self.host.focus(&node);
        }
    }
}
