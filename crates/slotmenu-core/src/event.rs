//! Raw interaction events delivered by the host.

use std::collections::BTreeMap;

use slotmenu_model::{
    ClickType, ContainerHandle, DragKind, ItemStack, OwnerId, RawSlot, TransferKind, ViewerId,
};

/// A click in some container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub viewer: ViewerId,
    /// Container the viewer has open.
    pub container: ContainerHandle,
    /// Owner of that container, if the host knows one.
    pub owner: Option<OwnerId>,
    pub raw_slot: RawSlot,
    pub click: ClickType,
    pub transfer: TransferKind,
    /// Item on the cursor before the click.
    pub cursor: Option<ItemStack>,
    /// Item in the clicked slot before the click.
    pub current: Option<ItemStack>,
    /// Hotbar slot for number-key clicks.
    pub hotbar_button: Option<usize>,
}

impl ClickEvent {
    pub fn new(
        viewer: ViewerId,
        container: ContainerHandle,
        raw_slot: RawSlot,
        transfer: TransferKind,
    ) -> Self {
        Self {
            viewer,
            container,
            owner: None,
            raw_slot,
            click: ClickType::Left,
            transfer,
            cursor: None,
            current: None,
            hotbar_button: None,
        }
    }

    #[must_use]
    pub fn with_click(mut self, click: ClickType) -> Self {
        self.click = click;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<ItemStack>) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub fn with_current(mut self, current: Option<ItemStack>) -> Self {
        self.current = current;
        self
    }

    #[must_use]
    pub fn with_hotbar_button(mut self, button: usize) -> Self {
        self.hotbar_button = Some(button);
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// A drag distributing the cursor over one or more slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub viewer: ViewerId,
    pub container: ContainerHandle,
    pub kind: DragKind,
    /// Cursor before the drag.
    pub old_cursor: Option<ItemStack>,
    /// Cursor the host would leave after the drag.
    pub cursor: Option<ItemStack>,
    /// Resulting item per dragged-over slot.
    pub new_items: BTreeMap<RawSlot, ItemStack>,
}

/// The viewer closed a container on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseEvent {
    pub viewer: ViewerId,
    pub container: ContainerHandle,
}
