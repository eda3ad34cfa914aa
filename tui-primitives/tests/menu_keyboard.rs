//! Keyboard flows through a menu coordinator with a paused clock

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tui_primitives::prelude::*;
use tui_primitives::{char_key, key, FakeHost, RecordingMiddleware, DEFAULT_SEARCH_DEBOUNCE};

fn host() -> FakeHost {
    let mut host = FakeHost::new();
    host.add_node("app", None, false)
        .add_node("delivery-button", Some("app"), true)
        .add_node("delivery-items", Some("app"), true)
        .add_node("sidebar", Some("app"), false);
    host
}

fn delivery_menu() -> (PopupCoordinator<MenuState, FakeHost>, Vec<ItemRegistration<MenuAction>>) {
    let mut menu = PopupCoordinator::new(MenuState::default(), host());
    menu.set_trigger(Some("delivery-button".to_string()));
    menu.set_surface(Some("delivery-items".to_string()));

    let handle = menu.handle();
    let items = [
        ("pickup", "Pickup"),
        ("home", "Home delivery"),
        ("dine", "Dine in"),
    ]
    .into_iter()
    .map(|(id, text)| ItemRegistration::menu_item(Some(&handle), id, ItemData::text(text)).unwrap())
    .collect();
    menu.process_pending();
    (menu, items)
}

fn active(menu: &PopupCoordinator<MenuState, FakeHost>) -> Option<&str> {
    menu.state().collection.active_id().map(ItemId::as_str)
}

#[tokio::test(start_paused = true)]
async fn test_open_navigate_activate() {
    let (mut menu, _items) = delivery_menu();
    let chosen = Arc::new(Mutex::new(Vec::new()));
    for id in ["pickup", "home", "dine"] {
        let chosen = chosen.clone();
        menu.on_activate(id, move || chosen.lock().unwrap().push(id));
    }

    menu.handle_event(PopupEvent::TriggerKey(key("down")));
    assert!(menu.state().is_open());
    assert_eq!(
        menu.next_deferred().await,
        Some(Deferred::FocusSurface(Some(Focus::First)))
    );
    assert_eq!(menu.host().focused(), Some("delivery-items"));
    assert_eq!(active(&menu), Some("pickup"));

    menu.handle_event(PopupEvent::SurfaceKey(key("down")));
    menu.handle_event(PopupEvent::SurfaceKey(key("down")));
    menu.handle_event(PopupEvent::SurfaceKey(key("down")));
    assert_eq!(active(&menu), Some("pickup"));

    menu.handle_event(PopupEvent::SurfaceKey(key("up")));
    assert_eq!(active(&menu), Some("dine"));

    let outcome = menu.handle_event(PopupEvent::SurfaceKey(key("enter")));
    assert!(outcome.consumed);
    assert!(!menu.state().is_open());
    assert_eq!(*chosen.lock().unwrap(), vec!["dine"]);

    assert_eq!(menu.next_deferred().await, Some(Deferred::FocusTrigger));
    assert_eq!(menu.host().focused(), Some("delivery-button"));
}

#[tokio::test(start_paused = true)]
async fn test_home_and_end() {
    let (mut menu, _items) = delivery_menu();
    menu.handle_event(PopupEvent::TriggerClick);
    menu.next_deferred().await;
    assert_eq!(active(&menu), None);

    menu.handle_event(PopupEvent::SurfaceKey(key("end")));
    assert_eq!(active(&menu), Some("dine"));
    menu.handle_event(PopupEvent::SurfaceKey(key("home")));
    assert_eq!(active(&menu), Some("pickup"));
}

#[tokio::test(start_paused = true)]
async fn test_typeahead_debounce_restarts_on_each_key() {
    let (mut menu, _items) = delivery_menu();
    menu.dispatch(MenuAction::OpenMenu);

    menu.handle_event(PopupEvent::SurfaceKey(char_key('d')));
    assert_eq!(active(&menu), Some("dine"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    menu.process_pending();
    assert_eq!(menu.state().collection.search_query(), "d");

    menu.handle_event(PopupEvent::SurfaceKey(char_key('i')));
    let typed = tokio::time::Instant::now();
    assert_eq!(menu.state().collection.search_query(), "di");

    assert_eq!(menu.next_deferred().await, Some(Deferred::ClearSearch));
    assert!(typed.elapsed() >= DEFAULT_SEARCH_DEBOUNCE);
    assert_eq!(menu.state().collection.search_query(), "");
    assert_eq!(active(&menu), Some("dine"));
}

#[tokio::test(start_paused = true)]
async fn test_key_after_idle_starts_fresh_query() {
    let (mut menu, _items) = delivery_menu();
    menu.dispatch(MenuAction::OpenMenu);

    menu.handle_event(PopupEvent::SurfaceKey(char_key('h')));
    assert_eq!(active(&menu), Some("home"));

    // The idle reset may already be queued, unapplied, when the next key lands
    tokio::time::sleep(Duration::from_millis(400)).await;
    menu.handle_event(PopupEvent::SurfaceKey(char_key('p')));
    assert_eq!(menu.state().collection.search_query(), "p");
    assert_eq!(active(&menu), Some("pickup"));

    menu.process_pending();
    assert_eq!(menu.state().collection.search_query(), "p");
    assert_eq!(active(&menu), Some("pickup"));

    assert_eq!(menu.next_deferred().await, Some(Deferred::ClearSearch));
    assert_eq!(menu.state().collection.search_query(), "");
}

#[tokio::test(start_paused = true)]
async fn test_repeated_letter_cycles_matches() {
    let (mut menu, items) = delivery_menu();
    items[0].set_text_value("Delivery pickup");
    menu.dispatch(MenuAction::OpenMenu);

    menu.handle_event(PopupEvent::SurfaceKey(char_key('d')));
    assert_eq!(active(&menu), Some("pickup"));

    menu.next_deferred().await;
    menu.handle_event(PopupEvent::SurfaceKey(char_key('d')));
    assert_eq!(active(&menu), Some("dine"));
}

#[tokio::test(start_paused = true)]
async fn test_outside_click_closes_and_refocuses_trigger() {
    let (mut menu, _items) = delivery_menu();
    menu.handle_event(PopupEvent::TriggerKey(key("enter")));
    menu.next_deferred().await;

    let inside = menu.handle_event(PopupEvent::PointerDown("delivery-items".to_string()));
    assert!(!inside.changed);
    assert!(menu.state().is_open());

    let outside = menu.handle_event(PopupEvent::PointerDown("sidebar".to_string()));
    assert!(outside.changed);
    assert!(outside.consumed);
    assert!(!menu.state().is_open());
    assert_eq!(menu.host().focused(), Some("delivery-button"));
}

#[tokio::test(start_paused = true)]
async fn test_unmounting_active_item_clears_active() {
    let (mut menu, mut items) = delivery_menu();
    menu.dispatch(MenuAction::OpenMenu);
    menu.handle_event(PopupEvent::SurfaceKey(key("end")));
    assert_eq!(active(&menu), Some("dine"));

    items.pop();
    menu.process_pending();
    assert_eq!(menu.state().collection.len(), 2);
    assert_eq!(active(&menu), None);
}

#[tokio::test(start_paused = true)]
async fn test_recording_middleware_sees_coordinator_actions() {
    let (mut menu, _items) = delivery_menu();
    let recorder = RecordingMiddleware::new();
    menu.add_middleware(recorder.clone());

    menu.handle_event(PopupEvent::TriggerClick);
    menu.handle_event(PopupEvent::SurfaceKey(key("esc")));

    assert_eq!(recorder.names(), vec!["OpenMenu", "CloseMenu"]);
}
