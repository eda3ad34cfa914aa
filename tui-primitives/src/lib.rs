//! tui-primitives: headless accessible UI primitives for Rust TUI apps
//!
//! Menus, listboxes and radio groups as reducers over plain state, with a
//! coordinator for keyboard, pointer and focus handling and WAI-ARIA style
//! attributes derived from the committed state. Rendering is optional: the
//! `components` module draws them with ratatui.
//!
//! # Example
//! ```ignore
//! use tui_primitives::prelude::*;
//!
//! let mut menu = PopupCoordinator::new(MenuState::default(), TerminalHost::new());
//! let handle = menu.handle();
//! let _edit = ItemRegistration::menu_item(Some(&handle), "edit", ItemData::text("Edit"))?;
//! menu.on_activate("edit", || tracing::info!("edit"));
//!
//! // In the event loop:
//! for event in view.handle_event(&terminal_event, props) {
//!     menu.handle_event(event);
//! }
//! ```

// Re-export everything from core
pub use tui_primitives_core::*;

// Re-export derive macros
pub use tui_primitives_macros::Action;

/// Ratatui views and the terminal host
pub use tui_primitives_components as components;

/// Prelude for convenient imports
pub mod prelude {
    pub use tui_primitives_core::prelude::*;

    // Derive macros
    pub use tui_primitives_macros::Action;

    // Views
    pub use tui_primitives_components::{
        Component, NodeId, PopupProps, PopupView, RadioProps, RadioView, TerminalHost,
    };
}
