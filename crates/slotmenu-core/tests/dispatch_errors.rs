//! Integration tests for click dispatch: built-in handlers, outside clicks
//! and containment of failing callbacks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmenu_core::{
    ClickEvent, Dynamic, Element, ElementTag, Engine, EngineConfig, MemoryHost, Menu, State,
    StateElement,
};
use slotmenu_model::{ItemStack, MenuId, RawSlot, TransferKind, ViewerId};

fn click(host: &MemoryHost, viewer: ViewerId, raw_slot: RawSlot) -> ClickEvent {
    let container = host.container_of(viewer).unwrap();
    ClickEvent::new(viewer, container, raw_slot, TransferKind::PickupAll)
}

fn show(engine: &mut Engine, host: &mut MemoryHost, menu: Menu) -> (MenuId, ViewerId) {
    let menu = engine.register(menu);
    let viewer = ViewerId::random();
    engine.show(host, menu, viewer).unwrap();
    (menu, viewer)
}

#[test]
fn failing_action_is_contained() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let menu = Menu::builder("Broken", &["abc"])
        .element(
            Element::item('a', ItemStack::new("tnt", 1))
                .with_action(|_| Err(anyhow::anyhow!("shop backend unavailable"))),
        )
        .element(Element::item('b', ItemStack::new("stone", 1)))
        .build()
        .unwrap();
    let (menu, viewer) = show(&mut engine, &mut host, menu);
    let other = ViewerId::random();
    engine.show(&mut host, menu, other).unwrap();
    let slots_before = engine.menu(menu).unwrap().slot_map().to_vec();

    let outcome = {
        let event = click(&host, viewer, RawSlot::Menu(0));
        engine.handle_click(&mut host, &event)
    };

    assert!(outcome.cancelled);
    assert!(outcome.resync);
    assert_eq!(outcome.failure.as_deref(), Some("shop backend unavailable"));
    assert_eq!(host.resyncs(viewer), 1);
    assert_eq!(
        engine.menu(menu).unwrap().slot_map(),
        slots_before.as_slice()
    );
    assert_eq!(engine.menu(menu).unwrap().elements().len(), 2);
    assert_eq!(engine.pending_tasks(), 0);
    assert_eq!(host.view(other), "tnt*1 stone*1 -");
}

#[test]
fn successful_action_applies_effects_and_broadcasts() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let seen = Rc::new(RefCell::new(None));
    let record = Rc::clone(&seen);
    let menu = Menu::builder("Shop", &["a"])
        .element(
            Element::item('a', ItemStack::new("apple", 1)).with_action(move |click| {
                *record.borrow_mut() = Some((click.slot(), click.element(), click.page()));
                click.message("bought an apple");
                click.set_cursor(Some(ItemStack::new("apple", 1)));
                Ok(false)
            }),
        )
        .build()
        .unwrap();
    let (menu, viewer) = show(&mut engine, &mut host, menu);
    let other = ViewerId::random();
    engine.show(&mut host, menu, other).unwrap();

    let outcome = {
        let event = click(&host, viewer, RawSlot::Menu(1));
        engine.handle_click(&mut host, &event)
    };

    assert!(!outcome.cancelled);
    assert_eq!(outcome.cursor, Some(Some(ItemStack::new("apple", 1))));
    assert_eq!(*seen.borrow(), Some((Some(1), Some(ElementTag::Static), 0)));
    assert_eq!(host.messages().len(), 1);
    assert_eq!(engine.pending_tasks(), 1);
}

#[test]
fn static_without_action_cancels() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let menu = Menu::builder("Plain", &["a"])
        .element(Element::item('a', ItemStack::new("apple", 1)))
        .build()
        .unwrap();
    let (_, viewer) = show(&mut engine, &mut host, menu);

    let on_item = {
        let event = click(&host, viewer, RawSlot::Menu(1));
        engine.handle_click(&mut host, &event)
    };
    let on_blank = {
        let event = click(&host, viewer, RawSlot::Menu(0));
        engine.handle_click(&mut host, &event)
    };

    assert!(on_item.cancelled && on_item.failure.is_none());
    assert!(on_blank.cancelled);
}

#[test]
fn outside_clicks_use_outside_action() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let plain = Menu::builder("Plain", &["a"]).build().unwrap();
    let (_, viewer) = show(&mut engine, &mut host, plain);
    let ignored = {
        let event = click(&host, viewer, RawSlot::Outside);
        engine.handle_click(&mut host, &event)
    };
    assert_eq!(ignored, slotmenu_core::ClickOutcome::ignored());

    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let guarded = Menu::builder("Guarded", &["a"])
        .outside_action(move |click| {
            assert_eq!(click.slot(), None);
            counter.set(counter.get() + 1);
            Ok(true)
        })
        .build()
        .unwrap();
    let (_, viewer) = show(&mut engine, &mut host, guarded);
    let outcome = {
        let event = click(&host, viewer, RawSlot::Outside);
        engine.handle_click(&mut host, &event)
    };

    assert!(outcome.cancelled);
    assert_eq!(hits.get(), 1);
}

#[test]
fn player_inventory_clicks_are_ignored() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let menu = Menu::builder("Plain", &["a"])
        .element(Element::item('a', ItemStack::new("apple", 1)))
        .build()
        .unwrap();
    let (_, viewer) = show(&mut engine, &mut host, menu);

    let outcome = {
        let event = click(&host, viewer, RawSlot::Player(5));
        engine.handle_click(&mut host, &event)
    };

    assert!(!outcome.cancelled);
}

#[test]
fn state_click_cycles_and_runs_callback() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let entered = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&entered);
    let toggle = StateElement::new(
        "off",
        vec![
            State::new("off", ItemStack::new("gray_dye", 1)),
            State::new("on", ItemStack::new("lime_dye", 1)).on_enter(move |click| {
                log.borrow_mut().push(click.slot());
                Ok(())
            }),
        ],
    )
    .unwrap();
    let menu = Menu::builder("Settings", &["t"])
        .element(Element::new('t', toggle))
        .build()
        .unwrap();
    let (_, viewer) = show(&mut engine, &mut host, menu);
    assert_eq!(host.view(viewer), "- gray_dye*1 -");

    let outcome = {
        let event = click(&host, viewer, RawSlot::Menu(1));
        engine.handle_click(&mut host, &event)
    };

    assert!(outcome.cancelled);
    assert_eq!(host.view(viewer), "- lime_dye*1 -");
    assert_eq!(*entered.borrow(), vec![Some(1)]);

    {
        let event = click(&host, viewer, RawSlot::Menu(1));
        engine.handle_click(&mut host, &event)
    };
    assert_eq!(host.view(viewer), "- gray_dye*1 -");
    assert_eq!(entered.borrow().len(), 1);
}

#[test]
fn failing_state_callback_is_contained() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let toggle = StateElement::from_states(vec![
        State::new("a", ItemStack::new("red_dye", 1)),
        State::new("b", ItemStack::new("blue_dye", 1))
            .on_enter(|_| Err(anyhow::anyhow!("cannot persist setting"))),
    ])
    .unwrap();
    let menu = Menu::builder("Settings", &["t"])
        .element(Element::new('t', toggle))
        .build()
        .unwrap();
    let (_, viewer) = show(&mut engine, &mut host, menu);

    let outcome = {
        let event = click(&host, viewer, RawSlot::Menu(1));
        engine.handle_click(&mut host, &event)
    };

    assert!(outcome.cancelled);
    assert_eq!(outcome.failure.as_deref(), Some("cannot persist setting"));
}

#[test]
fn failing_dynamic_query_is_contained_on_click() {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let dynamic = Dynamic::new(move |_| {
        counter.set(counter.get() + 1);
        if counter.get() > 1 {
            anyhow::bail!("profile lookup failed");
        }
        Ok(Some(Element::item('d', ItemStack::new("player_head", 1))))
    })
    .with_ttl(std::time::Duration::ZERO);
    let menu = Menu::builder("Profile", &["d"])
        .element(Element::new('d', dynamic))
        .build()
        .unwrap();
    let (_, viewer) = show(&mut engine, &mut host, menu);
    assert_eq!(host.view(viewer), "- player_head*1 -");

    std::thread::sleep(std::time::Duration::from_millis(2));
    let outcome = {
        let event = click(&host, viewer, RawSlot::Menu(1));
        engine.handle_click(&mut host, &event)
    };

    assert!(outcome.cancelled);
    assert_eq!(outcome.failure.as_deref(), Some("profile lookup failed"));
}
