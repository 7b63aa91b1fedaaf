//! Integration tests for drags over menu slots.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use slotmenu_core::{
    DragEvent, Element, Engine, EngineConfig, Host, MemoryHost, Menu, StorageProxy,
};
use slotmenu_model::{DragKind, ItemStack, ItemStorage, RawSlot, SharedStorage, ViewerId};

fn emerald(amount: u32) -> ItemStack {
    ItemStack::new("emerald", amount)
}

/// Storage in slots 0-1, a static item in slot 2.
fn setup(storage: &SharedStorage) -> (MemoryHost, Engine, ViewerId) {
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let menu = Menu::builder("Drop box", &["ssx"])
        .element(Element::new('s', StorageProxy::new(Rc::clone(storage))))
        .element(Element::item('x', ItemStack::new("barrier", 1)))
        .build()
        .unwrap();
    let menu = engine.register(menu);
    let viewer = ViewerId::random();
    engine.show(&mut host, menu, viewer).unwrap();
    (host, engine, viewer)
}

fn drag(
    host: &MemoryHost,
    viewer: ViewerId,
    kind: DragKind,
    old_cursor: ItemStack,
    cursor: Option<ItemStack>,
    slots: &[(RawSlot, ItemStack)],
) -> DragEvent {
    DragEvent {
        viewer,
        container: host.container_of(viewer).unwrap(),
        kind,
        old_cursor: Some(old_cursor),
        cursor,
        new_items: slots.iter().cloned().collect::<BTreeMap<_, _>>(),
    }
}

#[test]
fn single_slot_drag_is_a_click() {
    let storage = ItemStorage::new(2).shared();
    let (mut host, mut engine, viewer) = setup(&storage);

    let event = drag(
        &host,
        viewer,
        DragKind::Single,
        emerald(5),
        Some(emerald(4)),
        &[(RawSlot::Menu(0), emerald(1))],
    );
    let outcome = engine.handle_drag(&mut host, &event);

    assert!(!outcome.cancelled);
    assert_eq!(storage.borrow().get(0), Some(&emerald(1)));
}

#[test]
fn single_slot_drag_onto_static_is_cancelled() {
    let storage = ItemStorage::new(2).shared();
    let (mut host, mut engine, viewer) = setup(&storage);

    let event = drag(
        &host,
        viewer,
        DragKind::Even,
        emerald(5),
        None,
        &[(RawSlot::Menu(2), emerald(5))],
    );

    assert!(engine.handle_drag(&mut host, &event).cancelled);
}

#[test]
fn multi_slot_drag_writes_storage_and_returns_rest() {
    let storage = ItemStorage::new(2).shared();
    let (mut host, mut engine, viewer) = setup(&storage);

    let event = drag(
        &host,
        viewer,
        DragKind::Even,
        emerald(10),
        Some(emerald(4)),
        &[
            (RawSlot::Menu(0), emerald(3)),
            (RawSlot::Menu(2), emerald(3)),
        ],
    );
    let outcome = engine.handle_drag(&mut host, &event);

    assert!(!outcome.cancelled);
    assert_eq!(storage.borrow().get(0), Some(&emerald(3)));
    assert_eq!(outcome.cursor, Some(Some(emerald(7))));
    assert_eq!(engine.pending_tasks(), 1);

    let container = host.container_of(viewer).unwrap();
    host.set_item(container, 2, Some(emerald(3)));
    engine.run_pending(&mut host);
    assert_eq!(host.view(viewer), "- - barrier*1");
}

#[test]
fn multi_slot_drag_overflow_goes_to_inventory() {
    let storage = ItemStorage::new(2).shared();
    let (mut host, mut engine, viewer) = setup(&storage);

    let event = drag(
        &host,
        viewer,
        DragKind::Even,
        emerald(64),
        None,
        &[
            (RawSlot::Menu(2), emerald(32)),
            (RawSlot::Player(0), emerald(32)),
        ],
    );
    let outcome = engine.handle_drag(&mut host, &event);

    assert_eq!(outcome.cursor, Some(Some(emerald(32))));
    assert!(host.inventory(viewer).iter().all(Option::is_none));

    let event = drag(
        &host,
        viewer,
        DragKind::Even,
        emerald(64),
        Some(emerald(50)),
        &[
            (RawSlot::Menu(2), emerald(24)),
            (RawSlot::Player(0), emerald(24)),
        ],
    );
    let outcome = engine.handle_drag(&mut host, &event);

    assert_eq!(outcome.cursor, Some(Some(emerald(64))));
    assert_eq!(host.inventory(viewer)[0], Some(emerald(10)));
}

#[test]
fn failed_commit_undoes_earlier_drag_writes() {
    let storage = ItemStorage::from_items(vec![Some(emerald(2)), None]).shared();
    let commits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&commits);
    let proxy = StorageProxy::new(Rc::clone(&storage)).with_commit(move || {
        let call = counter.get();
        counter.set(call + 1);
        if call == 1 {
            anyhow::bail!("vault offline");
        }
        Ok(())
    });
    let mut host = MemoryHost::new();
    let mut engine = Engine::new(EngineConfig::default());
    let menu = Menu::builder("Vault", &["ss"])
        .element(Element::new('s', proxy))
        .build()
        .unwrap();
    let menu = engine.register(menu);
    let viewer = ViewerId::random();
    engine.show(&mut host, menu, viewer).unwrap();

    let event = drag(
        &host,
        viewer,
        DragKind::Even,
        emerald(8),
        None,
        &[
            (RawSlot::Menu(0), emerald(6)),
            (RawSlot::Menu(1), emerald(4)),
        ],
    );
    let outcome = engine.handle_drag(&mut host, &event);

    assert!(outcome.cancelled);
    assert!(outcome.failure.unwrap().contains("vault offline"));
    assert_eq!(commits.get(), 3);
    assert_eq!(
        *storage.borrow(),
        ItemStorage::from_items(vec![Some(emerald(2)), None])
    );
}
