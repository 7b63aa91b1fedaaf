//! Transaction simulator for storage-proxy slots.
//!
//! The host reports what a click *would* do; [`simulate`] works out the item
//! the backing storage ends up with so it can be validated and written
//! through instead of trusting the host's own container update.

use slotmenu_model::{ItemStack, TransferKind};

/// Normalised click on a storage-proxy slot.
#[derive(Debug, Clone)]
pub(crate) struct TransferInput<'a> {
    pub transfer: TransferKind,
    /// The click landed in the menu rather than the personal inventory.
    pub from_menu: bool,
    pub cursor: Option<&'a ItemStack>,
    /// Item the host reported in the clicked slot.
    pub current: Option<&'a ItemStack>,
    /// Item the backing storage holds for the clicked slot.
    pub slot_item: Option<&'a ItemStack>,
    /// Contents of the pressed hotbar slot; `None` without a button.
    pub hotbar_item: Option<Option<ItemStack>>,
    /// Post-drag item of a single-slot drag.
    pub dragged: Option<&'a ItemStack>,
    pub menu_has_space: bool,
    pub player_has_space: bool,
    pub reject_container_items: bool,
}

/// Decision for one storage transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// Write `item` to the backing slot (place-validated on write).
    Place {
        item: Option<ItemStack>,
        deferred_redraw: bool,
    },
    /// Leave the storage alone and cancel the interaction.
    Reject,
    /// Cancel and redraw the menu.
    RejectAndRedraw,
    /// Run the collect-to-cursor simulation.
    Collect,
    /// The host may apply the interaction; nothing changes.
    Allow,
    Unsupported(TransferKind),
}

/// Work out the storage effect of a click.
///
/// `can_take` is the slot's take validator applied to the item the storage
/// currently holds. Every kind that changes the slot needs it to pass.
pub(crate) fn simulate(
    input: &TransferInput<'_>,
    can_take: &dyn Fn(Option<&ItemStack>) -> bool,
) -> Transfer {
    let slot_item = input.slot_item;
    if input.reject_container_items
        && (input.cursor.is_some_and(ItemStack::is_container_like)
            || slot_item.is_some_and(ItemStack::is_container_like))
    {
        return Transfer::RejectAndRedraw;
    }

    if let Some(dragged) = input.dragged {
        return place(Some(dragged.clone()));
    }

    use TransferKind as K;
    match input.transfer {
        K::PickupSome | K::DropAllCursor | K::DropOneCursor | K::Unknown => {
            Transfer::Unsupported(input.transfer)
        }
        _ if !can_take(slot_item) => Transfer::Reject,
        K::Nothing | K::CloneStack => Transfer::Allow,
        K::MoveToOtherInventory => {
            let has_space = if input.from_menu {
                input.player_has_space
            } else {
                input.menu_has_space
            };
            if !has_space {
                return Transfer::Reject;
            }
            let item = if input.from_menu {
                None
            } else {
                input.current.cloned()
            };
            Transfer::Place {
                item,
                deferred_redraw: true,
            }
        }
        K::HotbarSwap | K::HotbarMoveAndReadd => match &input.hotbar_item {
            Some(item) => place(item.clone()),
            None => Transfer::Reject,
        },
        K::PickupOne | K::DropOneSlot => place(
            slot_item.map(|item| item.with_amount(item.amount.saturating_sub(1))),
        ),
        K::DropAllSlot => place(None),
        K::PickupHalf => place(slot_item.map(|item| item.with_amount(item.amount / 2))),
        K::PlaceSome => match (input.cursor, slot_item) {
            (None, _) => Transfer::Reject,
            (Some(cursor), None) => place(Some(cursor.clone())),
            (Some(cursor), Some(current)) => {
                let amount = (current.amount + cursor.amount).min(current.max_stack);
                place(Some(current.with_amount(amount)))
            }
        },
        K::PlaceOne => match (input.cursor, slot_item) {
            (None, _) => Transfer::Reject,
            (Some(cursor), None) => place(Some(cursor.with_amount(1))),
            (Some(_), Some(current)) => place(Some(current.with_amount(current.amount + 1))),
        },
        K::PlaceAll => match (input.cursor, slot_item) {
            (None, _) => Transfer::Reject,
            (Some(cursor), None) => place(Some(cursor.clone())),
            (Some(cursor), Some(current)) => {
                place(Some(cursor.with_amount(current.amount + cursor.amount)))
            }
        },
        K::PickupAll | K::SwapWithCursor => place(input.cursor.cloned()),
        K::CollectToCursor => {
            if input.cursor.is_some() && input.current.is_none() {
                Transfer::Collect
            } else {
                Transfer::Reject
            }
        }
    }
}

fn place(item: Option<ItemStack>) -> Transfer {
    Transfer::Place {
        item: item.and_then(ItemStack::non_empty),
        deferred_redraw: false,
    }
}
