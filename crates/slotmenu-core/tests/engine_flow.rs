//! Integration tests for showing, navigating and closing menus.

use std::cell::Cell;
use std::rc::Rc;

use slotmenu_core::{
    BackControl, ClickEvent, CloseEvent, Element, Engine, EngineConfig, MemoryHost, Menu,
    MenuError, Region,
};
use slotmenu_model::{ItemStack, MenuId, OwnerId, RawSlot, TransferKind, ViewerId};

fn apple() -> ItemStack {
    ItemStack::new("apple", 1)
}

fn main_menu(engine: &mut Engine) -> MenuId {
    let menu = Menu::builder("Main", &["a b"])
        .element(Element::item('a', apple()))
        .element(Element::item('b', ItemStack::new("book", 2)))
        .build()
        .unwrap();
    engine.register(menu)
}

fn sub_menu(engine: &mut Engine) -> MenuId {
    let menu = Menu::builder("Sub", &["<  "])
        .element(Element::new(
            '<',
            BackControl::new(ItemStack::new("arrow", 1)),
        ))
        .build()
        .unwrap();
    engine.register(menu)
}

fn click(host: &MemoryHost, viewer: ViewerId, slot: usize) -> ClickEvent {
    let container = host.container_of(viewer).unwrap();
    ClickEvent::new(
        viewer,
        container,
        RawSlot::Menu(slot),
        TransferKind::PickupAll,
    )
}

#[test]
fn show_opens_as_history_root() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let viewer = ViewerId::random();

    engine.show(&mut host, main, viewer).unwrap();

    assert_eq!(engine.get_open(&host, viewer), Some(main));
    assert_eq!(engine.history(viewer), vec![main]);
    assert_eq!(host.view(viewer), "apple*1 - book*2");
    let container = host.container_of(viewer).unwrap();
    assert_eq!(host.title(container), Some("Main"));
}

#[test]
fn showing_again_does_not_reopen() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let viewer = ViewerId::random();

    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, main, viewer).unwrap();

    assert_eq!(host.created(), 1);
    assert_eq!(engine.pending_tasks(), 0);
    assert_eq!(engine.history_depth(viewer), 1);
}

#[test]
fn nested_menu_opens_next_tick_and_back_returns() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let sub = sub_menu(&mut engine);
    let viewer = ViewerId::random();

    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, sub, viewer).unwrap();
    assert_eq!(engine.get_open(&host, viewer), Some(main));
    assert_eq!(host.take_scheduled().last(), Some(&Region::Global));

    assert_eq!(engine.run_region(&mut host, Region::Global), 1);
    assert_eq!(engine.get_open(&host, viewer), Some(sub));
    assert_eq!(engine.history(viewer), vec![main, sub]);
    assert_eq!(host.view(viewer), "arrow*1 - -");

    let outcome = {
        let event = click(&host, viewer, 0);
        engine.handle_click(&mut host, &event)
    };
    assert!(outcome.cancelled);
    engine.run_pending(&mut host);

    assert_eq!(engine.get_open(&host, viewer), Some(main));
    assert_eq!(engine.history(viewer), vec![main]);
    assert_eq!(host.view(viewer), "apple*1 - book*2");
}

#[test]
fn back_control_hidden_without_history() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let sub = sub_menu(&mut engine);
    let viewer = ViewerId::random();

    engine.show(&mut host, sub, viewer).unwrap();

    assert_eq!(host.view(viewer), "- - -");
}

#[test]
fn go_back_on_single_entry_reports_nothing() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let viewer = ViewerId::random();

    engine.show(&mut host, main, viewer).unwrap();

    assert!(!engine.go_back(&mut host, viewer).unwrap());
    assert_eq!(engine.history_depth(viewer), 0);
}

#[test]
fn close_goes_back_by_default() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let sub = sub_menu(&mut engine);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, sub, viewer).unwrap();
    engine.run_pending(&mut host);

    engine.close(&mut host, viewer, false);
    assert_eq!(engine.get_open(&host, viewer), None);
    assert!(engine.menu(sub).unwrap().viewers().is_empty());

    engine.run_pending(&mut host);
    assert_eq!(engine.get_open(&host, viewer), Some(main));
}

#[test]
fn close_with_clear_history_stays_closed() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let sub = sub_menu(&mut engine);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, sub, viewer).unwrap();
    engine.run_pending(&mut host);

    engine.close(&mut host, viewer, true);
    engine.run_pending(&mut host);

    assert_eq!(engine.get_open(&host, viewer), None);
    assert_eq!(engine.history_depth(viewer), 0);
}

#[test]
fn close_action_can_clear_history() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let sub = Menu::builder("Sub", &["x"])
        .element(Element::item('x', apple()))
        .close_action(move |_| {
            seen.set(seen.get() + 1);
            false
        })
        .build()
        .unwrap();
    let sub = engine.register(sub);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, sub, viewer).unwrap();
    engine.run_pending(&mut host);

    let container = host.dismiss(viewer).unwrap();
    engine.handle_close(&mut host, &CloseEvent { viewer, container });
    engine.run_pending(&mut host);

    assert_eq!(calls.get(), 1);
    assert_eq!(engine.get_open(&host, viewer), None);
    assert_eq!(engine.history_depth(viewer), 0);
    assert!(host.items(container).iter().all(Option::is_none));
}

#[test]
fn click_can_open_another_menu() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let sub = sub_menu(&mut engine);
    let main = Menu::builder("Main", &["o"])
        .element(Element::item('o', apple()).with_action(move |click| {
            click.open(sub);
            Ok(true)
        }))
        .build()
        .unwrap();
    let main = engine.register(main);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();

    {
        let event = click(&host, viewer, 1);
        engine.handle_click(&mut host, &event)
    };
    engine.run_pending(&mut host);

    assert_eq!(engine.get_open(&host, viewer), Some(sub));
    assert_eq!(engine.history(viewer), vec![main, sub]);
}

#[test]
fn title_change_recreates_container() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();

    engine.menu_mut(main).unwrap().set_title("Renamed");
    engine.show(&mut host, main, viewer).unwrap();
    engine.run_pending(&mut host);

    let container = host.container_of(viewer).unwrap();
    assert_eq!(host.created(), 2);
    assert_eq!(host.title(container), Some("Renamed"));
    assert_eq!(engine.get_open(&host, viewer), Some(main));
}

#[test]
fn destroy_closes_viewers_and_prunes_history() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let sub = sub_menu(&mut engine);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, sub, viewer).unwrap();
    engine.run_pending(&mut host);

    engine.destroy(&mut host, sub).unwrap();

    assert_eq!(engine.get_open(&host, viewer), None);
    assert_eq!(engine.history(viewer), vec![main]);
    assert!(engine.menu(sub).is_none());
    assert!(matches!(
        engine.destroy(&mut host, sub),
        Err(MenuError::MenuNotFound { .. })
    ));
}

#[test]
fn owner_lifecycle() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let owner = OwnerId::random();
    let menu = Menu::builder("Chest", &["a"])
        .element(Element::item('a', apple()))
        .owner(owner)
        .build()
        .unwrap();
    let menu = engine.register(menu);
    let viewer = ViewerId::random();
    engine.show(&mut host, menu, viewer).unwrap();
    assert_eq!(engine.menu_for_owner(owner), Some(menu));

    engine.owner_contents_changed(&mut host, owner);
    assert_eq!(engine.pending_tasks(), 1);
    engine.run_region(&mut host, Region::Global);

    assert!(engine.owner_destroyed(&mut host, owner));
    assert_eq!(engine.menu_for_owner(owner), None);
    assert_eq!(engine.get_open(&host, viewer), None);
    assert!(!engine.owner_destroyed(&mut host, owner));
}

#[test]
fn set_owner_moves_registration() {
    let mut engine = Engine::new(EngineConfig::default());
    let menu = main_menu(&mut engine);
    let (first, second) = (OwnerId::random(), OwnerId::random());

    engine.set_owner(menu, Some(first)).unwrap();
    engine.set_owner(menu, Some(second)).unwrap();

    assert_eq!(engine.menu_for_owner(first), None);
    assert_eq!(engine.menu_for_owner(second), Some(menu));
}

#[test]
fn hand_swap_cancelled_only_with_menu_open() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let main = main_menu(&mut engine);
    let viewer = ViewerId::random();
    assert!(!engine.handle_hand_swap(&host, viewer));

    engine.show(&mut host, main, viewer).unwrap();
    assert!(engine.handle_hand_swap(&host, viewer));

    let mut config = EngineConfig::default();
    config.capabilities.item_swap_event = false;
    let other = Engine::new(config);
    assert!(!other.handle_hand_swap(&host, viewer));
}

#[test]
fn multi_region_defers_to_viewer_region() {
    let mut host = MemoryHost::new();
    let mut config = EngineConfig::default();
    config.capabilities.multi_region = true;
    let mut engine = Engine::new(config);
    let main = main_menu(&mut engine);
    let sub = sub_menu(&mut engine);
    let viewer = ViewerId::random();
    engine.show(&mut host, main, viewer).unwrap();
    engine.show(&mut host, sub, viewer).unwrap();

    assert_eq!(engine.run_region(&mut host, Region::Global), 0);
    assert_eq!(engine.run_region(&mut host, Region::Viewer(viewer)), 1);
    assert_eq!(engine.get_open(&host, viewer), Some(sub));
}
