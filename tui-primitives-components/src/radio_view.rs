//! Radio group view

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tui_primitives_core::attributes::{self, ItemState, SurfaceAttributes};
use tui_primitives_core::listbox::OptionValue;
use tui_primitives_core::radio_group::RadioGroupState;
use tui_primitives_core::{ItemId, RadioEvent};

use crate::component::Component;
use crate::popup_view::{item_label, ItemView};
use crate::terminal_host::{NodeId, TerminalHost};

/// Props for [`RadioView`]
pub struct RadioProps<'a> {
    /// Group attributes
    pub group: SurfaceAttributes,
    /// Options in registration order
    pub options: Vec<ItemView>,
    /// Whether an option of the group has application focus
    pub is_focused: bool,
    /// Host used for hit-testing input
    pub host: &'a TerminalHost,
}

impl<'a> RadioProps<'a> {
    /// Props for the group element `id`.
    pub fn new<V: OptionValue>(
        state: &RadioGroupState<V>,
        id: &str,
        is_focused: bool,
        host: &'a TerminalHost,
    ) -> Self {
        let options = state
            .collection
            .items()
            .iter()
            .filter_map(|item| {
                Some(ItemView {
                    attributes: attributes::radio_option(state, &item.id)?,
                    label: item_label(item),
                })
            })
            .collect();

        Self {
            group: attributes::radio_group(state, id, None),
            options,
            is_focused,
            host,
        }
    }
}

/// One option per row: `(•) Label` when checked, `( ) Label` otherwise.
#[derive(Default)]
pub struct RadioView {
    layout: Vec<(NodeId, Rect, bool)>,
    group: Option<(NodeId, Rect)>,
    placed: Vec<NodeId>,
}

impl RadioView {
    /// Create a new RadioView
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the last rendered layout to the host.
    pub fn sync(&mut self, host: &mut TerminalHost) {
        let mut current = Vec::new();
        if let Some((group, rect)) = &self.group {
            host.place(group.clone(), *rect, None, false);
            current.push(group.clone());
            for (id, rect, focusable) in &self.layout {
                host.place(id.clone(), *rect, Some(group.clone()), *focusable);
                current.push(id.clone());
            }
        }
        for stale in self.placed.iter().filter(|id| !current.contains(id)) {
            host.remove(stale);
        }
        self.placed = current;
    }
}

impl Component<RadioEvent> for RadioView {
    type Props<'a> = RadioProps<'a>;

    fn handle_event(&mut self, event: &Event, props: Self::Props<'_>) -> impl IntoIterator<Item = RadioEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press && props.is_focused => {
                Some(RadioEvent::Key(*key))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                match props.host.hit_test(mouse.column, mouse.row) {
                    NodeId::Named(name)
                        if props.options.iter().any(|o| o.attributes.id == name) =>
                    {
                        Some(RadioEvent::Click(ItemId::new(name)))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.layout.clear();
        self.group = Some((NodeId::named(props.group.id.as_str()), area));

        for (row, option) in props.options.iter().take(area.height as usize).enumerate() {
            let rect = Rect::new(area.x, area.y + row as u16, area.width, 1);
            let state = option.attributes.state;
            let mark = if state.contains(ItemState::SELECTED) { "(•)" } else { "( )" };
            let style = if state.contains(ItemState::DISABLED) {
                Style::default().fg(Color::DarkGray)
            } else if props.is_focused && state.contains(ItemState::ACTIVE) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            frame.render_widget(
                Paragraph::new(Line::raw(format!("{mark} {}", option.label))).style(style),
                rect,
            );
            self.layout.push((
                NodeId::named(option.attributes.id.as_str()),
                rect,
                !state.contains(ItemState::DISABLED),
            ));
        }
    }
}
