//! Component trait for primitive views

use crossterm::event::Event;
use ratatui::{layout::Rect, Frame};

/// A view that renders from props and translates terminal input into
/// primitive events
///
/// Views never touch primitive state. Everything they show comes in through
/// `Props` (derived attributes, labels, focus), and everything they learn
/// from the terminal goes out as events for a coordinator. Layout from the
/// last render may be kept in `&mut self` for hit-testing.
pub trait Component<E> {
    /// Data required to render the view and interpret input (read-only)
    type Props<'a>;

    /// Translate a terminal event into primitive events.
    ///
    /// Default implementation returns no events (render-only views).
    #[allow(unused_variables)]
    fn handle_event(&mut self, event: &Event, props: Self::Props<'_>) -> impl IntoIterator<Item = E> {
        None::<E>
    }

    /// Render the view to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
