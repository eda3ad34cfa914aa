//! Core state machines for headless accessible UI primitives
//!
//! Menus, listboxes and radio groups share one model: a [`Collection`] of
//! registered items with an active index, moved by a [`Focus`] request and a
//! type-ahead query. Each primitive is a reducer over its own state; a
//! coordinator maps keyboard and pointer input onto actions and handles focus
//! through a [`Host`].
//!
//! # Core Concepts
//!
//! - **Action**: closed enums describing transitions (`MenuAction`, ...)
//! - **Store**: single-writer state container with middleware
//! - **Collection**: registry, active index and search query
//! - **Coordinator**: keyboard, pointer, outside-click and deferred focus
//! - **Attributes**: WAI-ARIA attributes derived from committed state
//!
//! # Basic Example
//!
//! ```
//! use tui_primitives_core::menu::{self, MenuAction, MenuState};
//! use tui_primitives_core::{Focus, ItemData, ItemId, Store};
//!
//! let mut store = Store::new(MenuState::default(), menu::reducer);
//! for (id, text) in [("edit", "Edit"), ("copy", "Copy")] {
//!     store.dispatch(MenuAction::RegisterItem {
//!         id: ItemId::from(id),
//!         data: ItemData::text(text).into(),
//!     });
//! }
//!
//! store.dispatch(MenuAction::OpenMenu);
//! store.dispatch(MenuAction::GoToItem(Focus::Last));
//! store.dispatch(MenuAction::GoToItem(Focus::Next));
//! assert_eq!(store.state().collection.active_id(), Some(&ItemId::from("edit")));
//! ```

pub mod action;
pub mod attributes;
pub mod collection;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod effect;
pub mod error;
pub mod event;
pub mod host;
pub mod keybindings;
pub mod listbox;
pub mod menu;
pub mod popup;
pub mod radio_group;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod search;
pub mod store;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionCategory};
pub use host::Host;
pub use popup::{OpenState, PopupIntent, PopupState};

// Model exports
pub use collection::Collection;
pub use listbox::OptionValue;
pub use registry::{Item, ItemData, ItemDataRef, ItemId};
pub use resolver::{calculate_active_index, Focus};
pub use search::DEFAULT_SEARCH_DEBOUNCE;

// Coordination exports
pub use context::{require_parent, ItemRegistration, ParentHandle};
pub use coordinator::{Deferred, PopupCoordinator, RadioGroupController};
pub use event::{Outcome, PopupEvent, RadioEvent};
pub use scheduler::{Scheduler, TaskKey};

// Attribute exports
pub use attributes::{attribute_pairs, ItemAttributes, ItemState, PartIds};

// Config and error exports
pub use config::{PrimitiveConfig, DEFAULT_FRAME_DELAY};
pub use error::{PrimitiveError, Result};
pub use keybindings::{
    commands, parse_key_string, BindingContext, KeyContext, Keybindings,
};

// Store exports
pub use store::{
    ComposedMiddleware, LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store,
    StoreWithMiddleware,
};

// Effect exports
pub use effect::{DispatchResult, EffectReducer, EffectStore};

// Testing exports
pub use testing::{char_key, ctrl_key, key, FakeHost, RecordingMiddleware};

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory};
    pub use crate::attributes::{ItemAttributes, ItemState, PartIds};
    pub use crate::collection::Collection;
    pub use crate::config::PrimitiveConfig;
    pub use crate::context::{ItemRegistration, ParentHandle};
    pub use crate::coordinator::{Deferred, PopupCoordinator, RadioGroupController};
    pub use crate::effect::{DispatchResult, EffectStore};
    pub use crate::error::PrimitiveError;
    pub use crate::event::{Outcome, PopupEvent, RadioEvent};
    pub use crate::host::Host;
    pub use crate::keybindings::{KeyContext, Keybindings};
    pub use crate::listbox::{ListboxAction, ListboxEffect, ListboxState};
    pub use crate::menu::{MenuAction, MenuState};
    pub use crate::popup::{OpenState, PopupState};
    pub use crate::radio_group::{RadioGroupAction, RadioGroupEffect, RadioGroupState};
    pub use crate::registry::{ItemData, ItemId};
    pub use crate::resolver::Focus;
    pub use crate::store::{LoggingMiddleware, Middleware, Store};
}
