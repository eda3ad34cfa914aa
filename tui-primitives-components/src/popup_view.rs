//! Trigger + popup surface view for menus and listboxes

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_primitives_core::attributes::{
    self, ItemAttributes, ItemState, PartIds, SurfaceAttributes, TriggerAttributes,
};
use tui_primitives_core::listbox::{ListboxState, OptionValue};
use tui_primitives_core::menu::MenuState;
use tui_primitives_core::{Item, ItemId, PopupEvent};

use crate::component::Component;
use crate::terminal_host::{NodeId, TerminalHost};

/// One item as the view sees it
#[derive(Clone, Debug)]
pub struct ItemView {
    /// Derived attributes, including render state
    pub attributes: ItemAttributes,
    /// Text shown for the item
    pub label: String,
}

pub(crate) fn item_label(item: &Item) -> String {
    item.data
        .read()
        .text_value
        .clone()
        .unwrap_or_else(|| item.id.to_string())
}

/// Rows for a bordered surface holding `items`, clamped to `available`.
fn surface_height(items: usize, available: u16) -> u16 {
    u16::try_from(items)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(available)
}

/// Props for [`PopupView`]
pub struct PopupProps<'a> {
    /// Text on the trigger
    pub label: String,
    /// Trigger attributes
    pub trigger: TriggerAttributes,
    /// Surface attributes
    pub surface: SurfaceAttributes,
    /// Items in registration order
    pub items: Vec<ItemView>,
    /// Whether the trigger has application focus
    pub is_focused: bool,
    /// Host used for hit-testing input
    pub host: &'a TerminalHost,
}

impl<'a> PopupProps<'a> {
    /// Props for a menu.
    pub fn menu(
        state: &MenuState,
        ids: &PartIds,
        label: impl Into<String>,
        is_focused: bool,
        host: &'a TerminalHost,
    ) -> Self {
        let items = state
            .collection
            .items()
            .iter()
            .filter_map(|item| {
                Some(ItemView {
                    attributes: attributes::menu_item(state, &item.id)?,
                    label: item_label(item),
                })
            })
            .collect();

        Self {
            label: label.into(),
            trigger: attributes::menu_trigger(state, ids),
            surface: attributes::menu_surface(state, ids),
            items,
            is_focused,
            host,
        }
    }

    /// Props for a listbox; the trigger shows the selected option or `placeholder`.
    pub fn listbox<V: OptionValue>(
        state: &ListboxState<V>,
        ids: &PartIds,
        placeholder: &str,
        is_focused: bool,
        host: &'a TerminalHost,
    ) -> Self {
        let items = state
            .collection
            .items()
            .iter()
            .filter_map(|item| {
                Some(ItemView {
                    attributes: attributes::listbox_option(state, &item.id)?,
                    label: item_label(item),
                })
            })
            .collect();
        let label = state
            .selected_id()
            .and_then(|id| state.collection.get(id))
            .map(item_label)
            .unwrap_or_else(|| placeholder.to_string());

        Self {
            label,
            trigger: attributes::listbox_trigger(state, ids),
            surface: attributes::listbox_surface(state, ids),
            items,
            is_focused,
            host,
        }
    }
}

struct Placed {
    id: NodeId,
    rect: Rect,
    parent: Option<NodeId>,
    focusable: bool,
}

/// Renders a trigger line and, while expanded, a bordered surface of items
/// below it.
///
/// After rendering, call [`PopupView::sync`] so the host knows where the
/// parts are.
#[derive(Default)]
pub struct PopupView {
    /// Scroll offset for the item viewport
    scroll_offset: usize,
    layout: Vec<Placed>,
    placed: Vec<NodeId>,
    hovered: Option<ItemId>,
}

impl PopupView {
    /// Create a new PopupView
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the active index is visible within the viewport
    fn ensure_visible(&mut self, active: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if active < self.scroll_offset {
            self.scroll_offset = active;
        } else if active >= self.scroll_offset + viewport_height {
            self.scroll_offset = active.saturating_sub(viewport_height - 1);
        }
    }

    /// Publish the last rendered layout to the host.
    pub fn sync(&mut self, host: &mut TerminalHost) {
        for stale in self
            .placed
            .iter()
            .filter(|id| !self.layout.iter().any(|p| &p.id == *id))
        {
            host.remove(stale);
        }
        for part in &self.layout {
            host.place(part.id.clone(), part.rect, part.parent.clone(), part.focusable);
        }
        self.placed = self.layout.iter().map(|p| p.id.clone()).collect();
    }

    fn item_at(target: &NodeId, props: &PopupProps<'_>) -> Option<ItemId> {
        let NodeId::Named(name) = target else {
            return None;
        };
        props
            .items
            .iter()
            .find(|item| &item.attributes.id == name)
            .map(|item| ItemId::new(name.as_str()))
    }

    fn item_style(state: ItemState) -> Style {
        if state.contains(ItemState::DISABLED) {
            Style::default().fg(Color::DarkGray)
        } else if state.contains(ItemState::ACTIVE) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }
}

impl Component<PopupEvent<NodeId>> for PopupView {
    type Props<'a> = PopupProps<'a>;

    fn handle_event(
        &mut self,
        event: &Event,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = PopupEvent<NodeId>> {
        let mut events = Vec::new();
        let expanded = props.trigger.aria_expanded;

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if expanded {
                    events.push(PopupEvent::SurfaceKey(*key));
                } else if props.is_focused {
                    events.push(PopupEvent::TriggerKey(*key));
                }
            }
            Event::Mouse(mouse) => {
                let target = props.host.hit_test(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        events.push(PopupEvent::PointerDown(target.clone()));
                        if target == NodeId::named(props.trigger.id.as_str()) {
                            events.push(PopupEvent::TriggerClick);
                        } else if let Some(id) = Self::item_at(&target, &props) {
                            events.push(PopupEvent::ItemClick(id));
                        }
                    }
                    MouseEventKind::Moved => {
                        let over = Self::item_at(&target, &props);
                        if let Some(previous) = self.hovered.take() {
                            if over.as_ref() != Some(&previous) {
                                events.push(PopupEvent::ItemPointerLeave(previous));
                            }
                        }
                        if let Some(id) = &over {
                            events.push(PopupEvent::ItemPointerMove(id.clone()));
                        }
                        self.hovered = over;
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        events
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.layout.clear();
        if area.height == 0 {
            return;
        }

        let trigger_id = NodeId::named(props.trigger.id.as_str());
        let expanded = props.trigger.aria_expanded;
        let marker = if expanded { "▴" } else { "▾" };
        let trigger_style = if props.trigger.aria_disabled == Some(true) {
            Style::default().fg(Color::DarkGray)
        } else if props.is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let trigger_rect = Rect { height: 1, ..area };
        frame.render_widget(
            Paragraph::new(Line::raw(format!("{} {marker}", props.label))).style(trigger_style),
            trigger_rect,
        );
        self.layout.push(Placed {
            id: trigger_id,
            rect: trigger_rect,
            parent: None,
            focusable: true,
        });

        if !expanded || area.height < 3 {
            self.hovered = None;
            return;
        }

        let surface_id = NodeId::named(props.surface.id.as_str());
        let surface_rect = Rect::new(
            area.x,
            area.y + 1,
            area.width,
            surface_height(props.items.len(), area.height - 1),
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(surface_rect);
        frame.render_widget(block, surface_rect);
        self.layout.push(Placed {
            id: surface_id.clone(),
            rect: surface_rect,
            parent: None,
            focusable: true,
        });

        let viewport = inner.height as usize;
        let max_offset = props.items.len().saturating_sub(viewport);
        self.scroll_offset = self.scroll_offset.min(max_offset);
        if let Some(active) = props
            .items
            .iter()
            .position(|item| item.attributes.state.contains(ItemState::ACTIVE))
        {
            self.ensure_visible(active, viewport);
        }

        for (row, item) in props
            .items
            .iter()
            .skip(self.scroll_offset)
            .take(viewport)
            .enumerate()
        {
            let rect = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
            let state = item.attributes.state;
            let prefix = if state.contains(ItemState::SELECTED) { "✓ " } else { "  " };
            frame.render_widget(
                Paragraph::new(Line::raw(format!("{prefix}{}", item.label)))
                    .style(Self::item_style(state)),
                rect,
            );
            self.layout.push(Placed {
                id: NodeId::named(item.attributes.id.as_str()),
                rect,
                parent: Some(surface_id.clone()),
                focusable: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::render_to_string;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use tui_primitives_core::listbox::ListboxAction;
    use tui_primitives_core::menu::{self, MenuAction};
    use tui_primitives_core::testing::key;
    use tui_primitives_core::{Deferred, Focus, ItemData, PopupCoordinator};

    fn menu_state() -> MenuState {
        let mut state = MenuState::default();
        for (id, text, disabled) in [("edit", "Edit", false), ("copy", "Copy", false), ("del", "Delete", true)] {
            let mut data = ItemData::text(text);
            data.disabled = disabled;
            menu::reducer(
                &mut state,
                MenuAction::RegisterItem {
                    id: ItemId::from(id),
                    data: data.into(),
                },
            );
        }
        state
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }

    fn click(column: u16, row: u16) -> Event {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    #[test]
    fn test_surface_height_saturates() {
        assert_eq!(surface_height(3, 20), 5);
        assert_eq!(surface_height(3, 4), 4);
        assert_eq!(surface_height(usize::from(u16::MAX), 40), 40);
        assert_eq!(surface_height(70_000, u16::MAX), u16::MAX);
    }

    #[test]
    fn test_render_closed() {
        let state = menu_state();
        let ids = PartIds::new("actions");
        let host = TerminalHost::new();
        let mut view = PopupView::new();

        let output = render_to_string(20, 6, |frame| {
            let props = PopupProps::menu(&state, &ids, "Actions", true, &host);
            view.render(frame, frame.area(), props);
        });

        assert!(output.contains("Actions ▾"));
        assert!(!output.contains("Edit"));
    }

    #[test]
    fn test_render_open_lists_items() {
        let mut state = menu_state();
        menu::reducer(&mut state, MenuAction::OpenMenu);
        menu::reducer(&mut state, MenuAction::GoToItem(Focus::Last));
        let ids = PartIds::new("actions");
        let mut host = TerminalHost::new();
        let mut view = PopupView::new();

        let output = render_to_string(20, 6, |frame| {
            let props = PopupProps::menu(&state, &ids, "Actions", true, &host);
            view.render(frame, frame.area(), props);
        });
        view.sync(&mut host);

        assert!(output.contains("Actions ▴"));
        assert!(output.contains("Edit"));
        assert!(output.contains("Copy"));
        assert!(output.contains("Delete"));
        assert_eq!(host.rect(&"copy".into()), Some(Rect::new(1, 3, 18, 1)));
        assert_eq!(host.rect(&"actions-items".into()), Some(Rect::new(0, 1, 20, 5)));
    }

    #[test]
    fn test_sync_removes_closed_surface() {
        let mut state = menu_state();
        menu::reducer(&mut state, MenuAction::OpenMenu);
        let ids = PartIds::new("actions");
        let mut host = TerminalHost::new();
        let mut view = PopupView::new();

        render_to_string(20, 6, |frame| {
            view.render(frame, frame.area(), PopupProps::menu(&state, &ids, "A", false, &host));
        });
        view.sync(&mut host);
        assert!(host.rect(&"edit".into()).is_some());

        menu::reducer(&mut state, MenuAction::CloseMenu);
        render_to_string(20, 6, |frame| {
            view.render(frame, frame.area(), PopupProps::menu(&state, &ids, "A", false, &host));
        });
        view.sync(&mut host);
        assert!(host.rect(&"edit".into()).is_none());
        assert!(host.rect(&"actions-button".into()).is_some());
    }

    #[test]
    fn test_mouse_translation() {
        let mut state = menu_state();
        menu::reducer(&mut state, MenuAction::OpenMenu);
        let ids = PartIds::new("actions");
        let mut host = TerminalHost::new();
        let mut view = PopupView::new();

        render_to_string(20, 6, |frame| {
            view.render(frame, frame.area(), PopupProps::menu(&state, &ids, "A", false, &host));
        });
        view.sync(&mut host);

        let props = || PopupProps::menu(&state, &ids, "A", false, &host);
        let events: Vec<_> = view.handle_event(&click(2, 2), props()).into_iter().collect();
        assert_eq!(
            events,
            vec![
                PopupEvent::PointerDown(NodeId::from("edit")),
                PopupEvent::ItemClick(ItemId::from("edit")),
            ]
        );

        let events: Vec<_> = view.handle_event(&click(1, 0), props()).into_iter().collect();
        assert_eq!(events[1], PopupEvent::TriggerClick);

        let events: Vec<_> = view.handle_event(&click(30, 10), props()).into_iter().collect();
        assert_eq!(events, vec![PopupEvent::PointerDown(NodeId::Screen)]);

        let moved: Vec<_> = view
            .handle_event(&mouse(MouseEventKind::Moved, 2, 3), props())
            .into_iter()
            .collect();
        assert_eq!(moved, vec![PopupEvent::ItemPointerMove(ItemId::from("copy"))]);

        let left: Vec<_> = view
            .handle_event(&mouse(MouseEventKind::Moved, 2, 0), props())
            .into_iter()
            .collect();
        assert_eq!(left, vec![PopupEvent::ItemPointerLeave(ItemId::from("copy"))]);
    }

    #[test]
    fn test_keys_route_by_expansion() {
        let state = menu_state();
        let ids = PartIds::new("actions");
        let host = TerminalHost::new();
        let mut view = PopupView::new();
        let down = Event::Key(key("down"));

        let unfocused: Vec<_> = view
            .handle_event(&down, PopupProps::menu(&state, &ids, "A", false, &host))
            .into_iter()
            .collect();
        assert!(unfocused.is_empty());

        let focused: Vec<_> = view
            .handle_event(&down, PopupProps::menu(&state, &ids, "A", true, &host))
            .into_iter()
            .collect();
        assert_eq!(focused, vec![PopupEvent::TriggerKey(key("down"))]);
    }

    #[test]
    fn test_listbox_label_shows_selection() {
        let mut state: ListboxState<u8> = ListboxState::default();
        for (id, text, value) in [("a", "Pickup", 1), ("b", "Home delivery", 2)] {
            tui_primitives_core::listbox::reducer(
                &mut state,
                ListboxAction::RegisterOption {
                    id: ItemId::from(id),
                    data: ItemData::text(text).into(),
                    value,
                },
            );
        }
        let ids = PartIds::new("method");
        let host = TerminalHost::new();

        let props = PopupProps::listbox(&state, &ids, "Choose…", false, &host);
        assert_eq!(props.label, "Choose…");

        tui_primitives_core::listbox::reducer(&mut state, ListboxAction::SetValue(Some(2)));
        let props = PopupProps::listbox(&state, &ids, "Choose…", false, &host);
        assert_eq!(props.label, "Home delivery");
        assert!(props.items[1].attributes.state.contains(ItemState::SELECTED));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_open_then_pick() {
        let ids = PartIds::new("actions");
        let mut coordinator = PopupCoordinator::new(menu_state(), TerminalHost::new());
        coordinator.set_trigger(Some(NodeId::named(ids.trigger.as_str())));
        coordinator.set_surface(Some(NodeId::named(ids.surface.as_str())));
        let mut view = PopupView::new();

        let draw = |c: &mut PopupCoordinator<MenuState, TerminalHost>, view: &mut PopupView| {
            render_to_string(20, 6, |frame| {
                let props = PopupProps::menu(c.state(), &ids, "Actions", true, c.host());
                view.render(frame, frame.area(), props);
            });
            view.sync(c.host_mut());
        };

        draw(&mut coordinator, &mut view);
        let events: Vec<_> = view
            .handle_event(
                &click(0, 0),
                PopupProps::menu(coordinator.state(), &ids, "Actions", true, coordinator.host()),
            )
            .into_iter()
            .collect();
        for event in events {
            coordinator.handle_event(event);
        }
        assert!(coordinator.state().is_open());

        draw(&mut coordinator, &mut view);
        assert_eq!(coordinator.next_deferred().await, Some(Deferred::FocusSurface(None)));
        assert!(coordinator.host().is_focused(&NodeId::named(ids.surface.as_str())));

        let events: Vec<_> = view
            .handle_event(
                &click(3, 3),
                PopupProps::menu(coordinator.state(), &ids, "Actions", true, coordinator.host()),
            )
            .into_iter()
            .collect();
        for event in events {
            coordinator.handle_event(event);
        }
        assert!(!coordinator.state().is_open());
        assert_eq!(coordinator.next_deferred().await, Some(Deferred::FocusTrigger));
        assert!(coordinator.host().is_focused(&NodeId::named(ids.trigger.as_str())));
    }
}
