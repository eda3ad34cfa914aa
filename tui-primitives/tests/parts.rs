//! Mounting parts under their parent primitive

use tui_primitives::prelude::*;
use tui_primitives::{require_parent, FakeHost};

#[test]
fn test_item_without_parent_fails_at_call_site() {
    let line = line!() + 1;
    let result = ItemRegistration::menu_item(None, "edit", ItemData::text("Edit"));

    let Err(err) = result else {
        panic!("expected a missing parent error");
    };
    let message = err.to_string();
    assert!(message.contains("<Menu.Item />"));
    assert!(message.contains("<Menu />"));
    assert!(message.contains(&format!("parts.rs:{line}")));
}

#[test]
fn test_option_without_parent_names_both_parts() {
    let err = ItemRegistration::<ListboxAction<u8>>::listbox_option(
        None,
        "a",
        ItemData::text("A"),
        1,
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        PrimitiveError::MissingParent {
            component: "Listbox.Option",
            parent: "Listbox",
            ..
        }
    ));
}

#[test]
fn test_require_parent_for_non_registering_parts() {
    let err = require_parent::<MenuAction>(None, "Menu.Button", "Menu").unwrap_err();
    assert!(err.to_string().contains("<Menu.Button />"));

    let c = PopupCoordinator::new(MenuState::default(), FakeHost::new());
    let handle = c.handle();
    let parent = require_parent(Some(&handle), "Menu.Button", "Menu").unwrap();
    assert_eq!(parent.name(), "Menu");
}

#[tokio::test]
async fn test_label_update_reaches_search_without_reregistering() {
    let mut c = PopupCoordinator::new(ListboxState::<u8>::default(), FakeHost::new());
    let handle = c.handle();
    let first = ItemRegistration::listbox_option(Some(&handle), "a", ItemData::text("Apple"), 1)
        .unwrap();
    let _second =
        ItemRegistration::listbox_option(Some(&handle), "b", ItemData::text("Banana"), 2).unwrap();
    c.process_pending();
    c.dispatch(ListboxAction::OpenListbox);

    first.set_text_value("Cherry");
    c.handle_event(PopupEvent::SurfaceKey(tui_primitives::char_key('c')));
    assert_eq!(c.state().collection.active_id(), Some(&ItemId::from("a")));
    assert_eq!(c.state().collection.len(), 2);
}

#[tokio::test]
async fn test_disabled_flag_change_is_seen_by_navigation() {
    let mut c = PopupCoordinator::new(MenuState::default(), FakeHost::new());
    let handle = c.handle();
    let items: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|id| ItemRegistration::menu_item(Some(&handle), id, ItemData::text(id)).unwrap())
        .collect();
    c.process_pending();
    c.dispatch(MenuAction::OpenMenu);

    items[1].set_disabled(true);
    c.handle_event(PopupEvent::SurfaceKey(tui_primitives::key("down")));
    c.handle_event(PopupEvent::SurfaceKey(tui_primitives::key("down")));
    assert_eq!(c.state().collection.active_id(), Some(&ItemId::from("c")));
}

#[test]
fn test_duplicate_registration_is_ignored() {
    let mut state = MenuState::default();
    let register = |id: &str| MenuAction::RegisterItem {
        id: ItemId::from(id),
        data: ItemData::text(id).into(),
    };
    assert!(tui_primitives::menu::reducer(&mut state, register("a")));
    assert!(!tui_primitives::menu::reducer(&mut state, register("a")));
    assert_eq!(state.collection.len(), 1);
}
