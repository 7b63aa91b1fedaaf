//! Collect-to-cursor simulation.
//!
//! The host's own double-click collection ignores validators and would
//! happily pull display items out of the menu, so it is replaced by a
//! validated scan over the menu's storage slots.

use std::rc::Rc;

use slotmenu_model::{ItemStack, MenuId, ViewerId};

use crate::element::Element;
use crate::engine::Engine;
use crate::host::Host;

impl Engine {
    /// Gather items similar to `cursor` into it.
    ///
    /// Returns the new cursor, or `None` when nothing in the menu matches
    /// and the host may run its own collection.
    pub(crate) fn collect_to_cursor(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        viewer: ViewerId,
        clicked: Option<usize>,
        cursor: &ItemStack,
    ) -> anyhow::Result<Option<ItemStack>> {
        let Some(entry) = self.menus.get(&menu) else {
            return Ok(None);
        };
        let Some(container) = entry.sessions.container(viewer) else {
            return Ok(None);
        };
        let page = entry.page(viewer);
        let elements: Vec<Option<Rc<Element>>> =
            (0..entry.size()).map(|slot| entry.element_at(slot)).collect();

        let mut cursor = cursor.clone();
        let mut found = false;
        for (slot, element) in elements.iter().enumerate() {
            if Some(slot) == clicked {
                continue;
            }
            if host
                .get_item(container, slot)
                .is_some_and(|shown| shown.is_similar(&cursor))
            {
                found = true;
            }
            let Some(element) = element else {
                continue;
            };
            let Some(storage) = element.as_storage() else {
                continue;
            };
            let Some(index) = element.storage_index(slot, page) else {
                continue;
            };
            let Some(mut item) = storage.item_at(index) else {
                continue;
            };
            if !item.is_similar(&cursor) || !storage.can_take(element.id(), slot, Some(&item)) {
                continue;
            }
            found = true;
            cursor.absorb(&mut item);
            storage.replace(index, item.non_empty())?;
            if cursor.is_full() {
                break;
            }
        }

        if !found {
            tracing::trace!(%menu, %viewer, "nothing to collect");
            return Ok(None);
        }

        if let Some(slot) = clicked {
            if let Some(Some(element)) = elements.get(slot) {
                if let (Some(storage), Some(index)) =
                    (element.as_storage(), element.storage_index(slot, page))
                {
                    storage.replace(index, None)?;
                }
            }
        }

        for index in 0..host.player_inventory_size(viewer) {
            if cursor.is_full() {
                break;
            }
            if let Some(mut item) = host.player_item(viewer, index) {
                if cursor.absorb(&mut item).is_some() {
                    host.set_player_item(viewer, index, item.non_empty());
                }
            }
        }

        tracing::debug!(%menu, %viewer, cursor = %cursor, "collected to cursor");
        self.draw_all(host, menu, false)?;
        Ok(Some(cursor))
    }
}
