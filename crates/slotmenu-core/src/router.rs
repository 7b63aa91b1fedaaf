//! Click router: turns raw host events into element actions.
//!
//! A click resolves to the element in the clicked slot (or the menu's
//! outside action), runs its handler with a [`Click`] context and applies
//! the requested effects. Handler failures are contained here: the
//! interaction is cancelled, the viewer resynced and the error logged.

use std::rc::Rc;

use slotmenu_model::{
    ClickType, ContainerHandle, DragKind, ItemStack, MenuId, RawSlot, TransferKind, ViewerId,
};

use crate::click::{Click, ClickOutcome, ClickParts, Effect};
use crate::element::{Action, Element, ElementKind, ElementTag, PageControl};
use crate::engine::{Engine, Task};
use crate::event::{ClickEvent, CloseEvent, DragEvent};
use crate::host::{Host, Region};
use crate::transfer::{self, Transfer, TransferInput};

/// A click after slot normalisation.
#[derive(Debug, Clone)]
struct Interaction {
    viewer: ViewerId,
    container: ContainerHandle,
    slot: Option<usize>,
    from_menu: bool,
    click: ClickType,
    transfer: TransferKind,
    cursor: Option<ItemStack>,
    current: Option<ItemStack>,
    dragged: Option<ItemStack>,
    hotbar_button: Option<usize>,
}

impl Interaction {
    fn from_event(event: &ClickEvent, slot: Option<usize>, from_menu: bool) -> Self {
        Self {
            viewer: event.viewer,
            container: event.container,
            slot,
            from_menu,
            click: event.click,
            transfer: event.transfer,
            cursor: event.cursor.clone(),
            current: event.current.clone(),
            dragged: None,
            hotbar_button: event.hotbar_button,
        }
    }
}

/// Handler chosen for a click.
enum Handler {
    Custom(Action),
    State(Rc<Element>),
    Storage(Rc<Element>),
    Page(PageControl),
    Back { close_if_empty: bool },
}

impl Engine {
    /// Route a click in the viewer's open container.
    pub fn handle_click(&mut self, host: &mut dyn Host, event: &ClickEvent) -> ClickOutcome {
        let Some(menu) = self.menu_of_container(event.viewer, event.container) else {
            if let Some(menu) = event.owner.and_then(|owner| self.menu_for_owner(owner)) {
                self.defer(
                    host,
                    Region::Global,
                    Task::RedrawAll {
                        menu,
                        refresh_dynamic: false,
                    },
                );
            }
            return ClickOutcome::ignored();
        };
        let size = self.menus.get(&menu).map_or(0, |entry| entry.size());

        match event.raw_slot {
            RawSlot::Menu(slot) if slot < size => {
                self.dispatch(host, menu, Interaction::from_event(event, Some(slot), true))
            }
            RawSlot::Menu(_) => ClickOutcome::ignored(),
            RawSlot::Outside => self.dispatch(host, menu, Interaction::from_event(event, None, true)),
            RawSlot::Player(_) => match event.transfer {
                TransferKind::MoveToOtherInventory => match host.first_empty(event.container, size) {
                    Some(slot) => {
                        self.dispatch(host, menu, Interaction::from_event(event, Some(slot), false))
                    }
                    None => {
                        host.resync(event.viewer);
                        ClickOutcome::cancelled()
                    }
                },
                TransferKind::CollectToCursor => {
                    let Some(cursor) = &event.cursor else {
                        return ClickOutcome::ignored();
                    };
                    match self.collect_to_cursor(host, menu, event.viewer, None, cursor) {
                        Ok(Some(cursor)) => {
                            host.resync(event.viewer);
                            ClickOutcome {
                                cursor: Some(Some(cursor)),
                                ..ClickOutcome::cancelled()
                            }
                        }
                        Ok(None) => ClickOutcome::ignored(),
                        Err(error) => self.contain(host, menu, event.viewer, None, None, &error),
                    }
                }
                _ => ClickOutcome::ignored(),
            },
        }
    }

    /// Route a drag over the viewer's open container.
    ///
    /// A drag onto exactly one menu slot is handled as a click on it. Drags
    /// over several slots write through storage proxies; every other
    /// dragged-over menu slot is put back next tick and its share returns to
    /// the cursor.
    pub fn handle_drag(&mut self, host: &mut dyn Host, event: &DragEvent) -> ClickOutcome {
        let Some(menu) = self.menu_of_container(event.viewer, event.container) else {
            return ClickOutcome::ignored();
        };
        let Some(entry) = self.menus.get(&menu) else {
            return ClickOutcome::ignored();
        };
        let size = entry.size();
        let page = entry.page(event.viewer);
        let menu_slots: Vec<(usize, &ItemStack, Option<Rc<Element>>)> = event
            .new_items
            .iter()
            .filter_map(|(raw, item)| match raw {
                RawSlot::Menu(slot) if *slot < size => Some((*slot, item, entry.element_at(*slot))),
                _ => None,
            })
            .collect();
        if menu_slots.is_empty() {
            return ClickOutcome::ignored();
        }

        if event.new_items.len() == 1 {
            let (slot, item, _) = &menu_slots[0];
            let (click, transfer) = match event.kind {
                DragKind::Single => (ClickType::Right, TransferKind::PlaceOne),
                DragKind::Even => (ClickType::Left, TransferKind::PlaceSome),
            };
            let interaction = Interaction {
                viewer: event.viewer,
                container: event.container,
                slot: Some(*slot),
                from_menu: true,
                click,
                transfer,
                cursor: event.old_cursor.clone(),
                current: host.get_item(event.container, *slot),
                dragged: Some((*item).clone()),
                hotbar_button: None,
            };
            return self.dispatch(host, menu, interaction);
        }

        let mut rest: u32 = 0;
        let mut resets = Vec::new();
        let mut written = Vec::new();
        for (slot, item, element) in menu_slots {
            let previous = host.get_item(event.container, slot);
            if let Some(element) = element.filter(|element| element.as_storage().is_some()) {
                let stored = element.storage_item(slot, page);
                match element.set_storage_item(slot, page, Some(item.clone())) {
                    Ok(true) => {
                        written.push((element, slot, stored));
                        continue;
                    }
                    Ok(false) => {}
                    Err(error) => {
                        undo_storage_writes(written, page);
                        let tag = Some(element.tag());
                        return self.contain(host, menu, event.viewer, Some(slot), tag, &error);
                    }
                }
            }
            let before = previous
                .as_ref()
                .filter(|previous| previous.is_similar(item))
                .map_or(0, |previous| previous.amount);
            rest += item.amount.saturating_sub(before);
            resets.push((slot, previous));
        }

        if !resets.is_empty() {
            self.defer(
                host,
                self.region_for(event.viewer),
                Task::SetSlots {
                    viewer: event.viewer,
                    container: event.container,
                    items: resets,
                },
            );
        }

        let mut outcome = ClickOutcome::ignored();
        if rest > 0 {
            if let Some(old) = &event.old_cursor {
                let base = match &event.cursor {
                    Some(cursor) if cursor.is_similar(old) => cursor.clone(),
                    _ => old.with_amount(0),
                };
                let total = base.amount + rest;
                let kept = total.min(base.max_stack);
                if total > kept {
                    host.give(event.viewer, base.with_amount(total - kept));
                }
                outcome.cursor = Some(Some(base.with_amount(kept)));
            }
        }
        self.broadcast(host, menu, event.viewer);
        outcome
    }

    /// The viewer closed the container on their own.
    pub fn handle_close(&mut self, host: &mut dyn Host, event: &CloseEvent) {
        self.container_closed(host, event.viewer, event.container);
    }

    /// Whether an off-hand swap must be cancelled.
    pub fn handle_hand_swap(&self, host: &dyn Host, viewer: ViewerId) -> bool {
        self.config().capabilities.item_swap_event && self.get_open(host, viewer).is_some()
    }

    fn dispatch(&mut self, host: &mut dyn Host, menu: MenuId, interaction: Interaction) -> ClickOutcome {
        let viewer = interaction.viewer;
        let ctx = self.render_context(viewer);
        let Some(entry) = self.menus.get_mut(&menu) else {
            return ClickOutcome::ignored();
        };
        let page = entry.page(viewer);
        let page_count = entry.page_count(viewer);

        let (handler, tag) = match interaction.slot {
            Some(slot) => {
                let Some(top) = entry.element_at(slot) else {
                    host.resync(viewer);
                    return ClickOutcome::cancelled();
                };
                let mut scope = entry.scope(viewer, &ctx);
                match top.resolve(&mut scope, slot) {
                    Ok(Some(element)) => {
                        let tag = element.tag();
                        match handler_for(element) {
                            Some(handler) => (handler, Some(tag)),
                            None => {
                                host.resync(viewer);
                                return ClickOutcome::cancelled();
                            }
                        }
                    }
                    Ok(None) => {
                        host.resync(viewer);
                        return ClickOutcome::cancelled();
                    }
                    Err(error) => {
                        let tag = Some(top.tag());
                        return self.contain(host, menu, viewer, Some(slot), tag, &error);
                    }
                }
            }
            None => match &entry.outside_action {
                Some(action) => (Handler::Custom(Rc::clone(action)), None),
                None => return ClickOutcome::ignored(),
            },
        };

        let mut click = Click::new(ClickParts {
            menu,
            viewer,
            slot: interaction.slot,
            click_type: interaction.click,
            transfer: interaction.transfer,
            element: tag,
            page,
            page_count,
            cursor: interaction.cursor.clone(),
            current: interaction.current.clone(),
            dragged: interaction.dragged.clone(),
            hotbar_button: interaction.hotbar_button,
        });

        let result = match handler {
            Handler::Custom(action) => action(&mut click),
            Handler::State(element) => enter_next_state(&element, &mut click),
            Handler::Storage(element) => {
                self.storage_transfer(host, menu, &element, &interaction, page, &mut click)
            }
            Handler::Page(control) => {
                if let Some(target) = control.target(page, page_count) {
                    click.set_page(target);
                }
                Ok(true)
            }
            Handler::Back { close_if_empty } => {
                click.go_back(close_if_empty);
                Ok(true)
            }
        };

        match result {
            Ok(cancel) => {
                let cursor = click.take_cursor();
                self.apply_effects(host, menu, &interaction, click.take_effects());
                self.broadcast(host, menu, viewer);
                if cancel {
                    host.resync(viewer);
                }
                ClickOutcome {
                    cancelled: cancel,
                    resync: cancel,
                    cursor,
                    failure: None,
                }
            }
            Err(error) => self.contain(host, menu, viewer, interaction.slot, tag, &error),
        }
    }

    /// Storage-proxy transfer: simulate, validate and write through.
    fn storage_transfer(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        element: &Element,
        interaction: &Interaction,
        page: usize,
        click: &mut Click,
    ) -> anyhow::Result<bool> {
        let (Some(storage), Some(slot)) = (element.as_storage(), interaction.slot) else {
            return Ok(true);
        };
        let Some(index) = element.storage_index(slot, page) else {
            tracing::trace!(%menu, element = %element.id(), slot, page, "slot maps outside the storage");
            return Ok(true);
        };
        let viewer = interaction.viewer;
        let slot_item = storage.item_at(index);
        let size = self.menus.get(&menu).map_or(0, |entry| entry.size());
        let input = TransferInput {
            transfer: interaction.transfer,
            from_menu: interaction.from_menu,
            cursor: interaction.cursor.as_ref(),
            current: interaction.current.as_ref(),
            slot_item: slot_item.as_ref(),
            hotbar_item: interaction
                .hotbar_button
                .map(|button| host.player_item(viewer, button)),
            dragged: interaction.dragged.as_ref(),
            menu_has_space: host.first_empty(interaction.container, size).is_some(),
            player_has_space: host.player_has_space(viewer),
            reject_container_items: self.config().transfers.reject_container_items,
        };
        let id = element.id();
        let transfer = transfer::simulate(&input, &|item: Option<&ItemStack>| {
            storage.can_take(id, slot, item)
        });
        tracing::trace!(%menu, element = %id, slot, index, kind = %interaction.transfer, ?transfer, "storage transfer simulated");

        match transfer {
            Transfer::Allow => Ok(false),
            Transfer::Reject => Ok(true),
            Transfer::RejectAndRedraw => {
                self.draw(host, menu, viewer, false)?;
                Ok(true)
            }
            Transfer::Unsupported(kind) => {
                tracing::warn!(%menu, %viewer, kind = %kind, "unsupported transfer");
                click.message(self.config().transfers.unsupported_text(kind.as_str()));
                Ok(true)
            }
            Transfer::Collect => {
                let Some(cursor) = &interaction.cursor else {
                    return Ok(true);
                };
                match self.collect_to_cursor(host, menu, viewer, Some(slot), cursor)? {
                    Some(cursor) => {
                        click.set_cursor(Some(cursor));
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            Transfer::Place {
                item,
                deferred_redraw,
            } => {
                if deferred_redraw {
                    self.defer(
                        host,
                        self.region_for(viewer),
                        Task::RedrawAll {
                            menu,
                            refresh_dynamic: false,
                        },
                    );
                }
                let written = storage.write(id, slot, Some(index), item)?;
                Ok(!written)
            }
        }
    }

    fn apply_effects(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        interaction: &Interaction,
        effects: Vec<Effect>,
    ) {
        let viewer = interaction.viewer;
        for effect in effects {
            let result = match effect {
                Effect::SetPage(page) => self.set_page(host, menu, viewer, page),
                Effect::Redraw => self.draw_all(host, menu, true),
                Effect::DeferredRedraw => {
                    self.defer(
                        host,
                        self.region_for(viewer),
                        Task::RedrawAll {
                            menu,
                            refresh_dynamic: true,
                        },
                    );
                    Ok(())
                }
                Effect::Open(target) => self.show(host, target, viewer),
                Effect::GoBack { close_if_empty } => match self.go_back(host, viewer) {
                    Ok(false) if close_if_empty => {
                        self.defer(host, self.region_for(viewer), Task::Close { viewer });
                        Ok(())
                    }
                    other => other.map(drop),
                },
                Effect::Close { clear_history } => {
                    if clear_history {
                        self.clear_history(viewer);
                    }
                    self.defer(host, self.region_for(viewer), Task::Close { viewer });
                    Ok(())
                }
                Effect::SetCurrentItem(item) => {
                    if let Some(slot) = interaction.slot {
                        host.set_item(interaction.container, slot, item);
                    }
                    Ok(())
                }
                Effect::Message(text) => {
                    host.send_message(viewer, &text);
                    Ok(())
                }
            };
            if let Err(error) = result {
                tracing::warn!(%menu, %viewer, %error, "click effect failed");
            }
        }
    }

    /// Redraw the menu for every other viewer on the next tick.
    fn broadcast(&mut self, host: &mut dyn Host, menu: MenuId, acting: ViewerId) {
        let viewers = self.menus.get(&menu).map(|entry| entry.viewers()).unwrap_or_default();
        for viewer in viewers.into_iter().filter(|viewer| *viewer != acting) {
            self.defer(
                host,
                self.region_for(viewer),
                Task::Redraw {
                    menu,
                    viewer,
                    refresh_dynamic: false,
                },
            );
        }
    }

    /// Report a failed handler and cancel the interaction.
    fn contain(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        viewer: ViewerId,
        slot: Option<usize>,
        tag: Option<ElementTag>,
        error: &anyhow::Error,
    ) -> ClickOutcome {
        let title = self.menus.get(&menu).map(|entry| entry.title().to_string()).unwrap_or_default();
        let failure = format!("{error:#}");
        tracing::error!(
            %menu,
            %viewer,
            slot = ?slot,
            element = ?tag,
            title = %title,
            error = %failure,
            "click handler failed"
        );
        host.resync(viewer);
        ClickOutcome::failed(failure)
    }
}

/// Put back storage items written earlier in a drag that then failed.
fn undo_storage_writes(written: Vec<(Rc<Element>, usize, Option<ItemStack>)>, page: usize) {
    for (element, slot, stored) in written.into_iter().rev() {
        let (Some(storage), Some(index)) = (element.as_storage(), element.storage_index(slot, page))
        else {
            continue;
        };
        if let Err(error) = storage.replace(index, stored) {
            tracing::error!(element = %element.id(), slot, error = %format!("{error:#}"), "failed to restore dragged storage item");
        }
    }
}

fn handler_for(element: Rc<Element>) -> Option<Handler> {
    if let Some(action) = element.action() {
        return Some(Handler::Custom(Rc::clone(action)));
    }
    match element.kind() {
        ElementKind::State(_) => Some(Handler::State(element)),
        ElementKind::Storage(_) => Some(Handler::Storage(element)),
        ElementKind::Paginator(paginator) => Some(Handler::Page(paginator.control())),
        ElementKind::Back(back) => Some(Handler::Back {
            close_if_empty: back.close_if_empty(),
        }),
        ElementKind::Static(_) | ElementKind::Group(_) | ElementKind::Dynamic(_) => None,
    }
}

/// Built-in state handler: advance, show the new state and run its callback.
fn enter_next_state(element: &Element, click: &mut Click) -> anyhow::Result<bool> {
    let Some(state) = element.as_state() else {
        return Ok(true);
    };
    let next = state.next_state(click.viewer());
    click.set_current_item(Some(next.display().clone()));
    if let Some(callback) = next.callback() {
        callback(click)?;
    }
    Ok(true)
}
