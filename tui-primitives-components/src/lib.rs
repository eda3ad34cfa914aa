//! Ratatui views for tui-primitives
//!
//! Views render from derived attributes and translate crossterm input into
//! primitive events. They never own primitive state: a coordinator from
//! `tui-primitives-core` does, together with a [`TerminalHost`] that the
//! views keep up to date with where each part was drawn.
//!
//! # Views
//!
//! - [`PopupView`] - Trigger row plus a bordered item surface (Menu, Listbox)
//! - [`RadioView`] - One row per option
//!
//! # Example
//!
//! ```ignore
//! use tui_primitives_components::{PopupProps, PopupView, TerminalHost};
//!
//! // In your render function:
//! let props = PopupProps::menu(coordinator.state(), &ids, "Actions", focused, coordinator.host());
//! view.render(frame, area, props);
//! // After the frame is drawn:
//! view.sync(coordinator.host_mut());
//! ```

mod component;
mod popup_view;
mod radio_view;
mod terminal_host;
pub mod testing;

pub use component::Component;
pub use popup_view::{ItemView, PopupProps, PopupView};
pub use radio_view::{RadioProps, RadioView};
pub use terminal_host::{NodeId, TerminalHost};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Component, ItemView, NodeId, PopupProps, PopupView, RadioProps, RadioView, TerminalHost,
    };
}
