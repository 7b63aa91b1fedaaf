//! Click context handed to actions, and the outcome reported to the host.

use slotmenu_model::{ClickType, ItemStack, MenuId, TransferKind, ViewerId};

use crate::element::ElementTag;

/// Follow-up work an action requests. Applied by the engine once the
/// action has returned successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    SetPage(usize),
    Redraw,
    DeferredRedraw,
    Open(MenuId),
    GoBack { close_if_empty: bool },
    Close { clear_history: bool },
    SetCurrentItem(Option<ItemStack>),
    Message(String),
}

/// Context of one click, passed to element actions.
#[derive(Debug, Clone)]
pub struct Click {
    menu: MenuId,
    viewer: ViewerId,
    slot: Option<usize>,
    click_type: ClickType,
    transfer: TransferKind,
    element: Option<ElementTag>,
    page: usize,
    page_count: usize,
    cursor: Option<ItemStack>,
    current: Option<ItemStack>,
    dragged: Option<ItemStack>,
    hotbar_button: Option<usize>,
    cursor_changed: bool,
    effects: Vec<Effect>,
}

pub(crate) struct ClickParts {
    pub menu: MenuId,
    pub viewer: ViewerId,
    pub slot: Option<usize>,
    pub click_type: ClickType,
    pub transfer: TransferKind,
    pub element: Option<ElementTag>,
    pub page: usize,
    pub page_count: usize,
    pub cursor: Option<ItemStack>,
    pub current: Option<ItemStack>,
    pub dragged: Option<ItemStack>,
    pub hotbar_button: Option<usize>,
}

impl Click {
    pub(crate) fn new(parts: ClickParts) -> Self {
        Self {
            menu: parts.menu,
            viewer: parts.viewer,
            slot: parts.slot,
            click_type: parts.click_type,
            transfer: parts.transfer,
            element: parts.element,
            page: parts.page,
            page_count: parts.page_count,
            cursor: parts.cursor,
            current: parts.current,
            dragged: parts.dragged,
            hotbar_button: parts.hotbar_button,
            cursor_changed: false,
            effects: Vec::new(),
        }
    }

    pub fn menu(&self) -> MenuId {
        self.menu
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    /// Clicked menu slot; `None` for clicks outside the container.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn click_type(&self) -> ClickType {
        self.click_type
    }

    pub fn transfer(&self) -> TransferKind {
        self.transfer
    }

    /// Kind of the element that handles the click.
    pub fn element(&self) -> Option<ElementTag> {
        self.element
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn cursor(&self) -> Option<&ItemStack> {
        self.cursor.as_ref()
    }

    /// Item the host reported in the clicked slot.
    pub fn current(&self) -> Option<&ItemStack> {
        self.current.as_ref()
    }

    /// Resulting item when the click comes from a single-slot drag.
    pub fn dragged(&self) -> Option<&ItemStack> {
        self.dragged.as_ref()
    }

    pub fn is_drag(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn hotbar_button(&self) -> Option<usize> {
        self.hotbar_button
    }

    pub fn set_cursor(&mut self, cursor: Option<ItemStack>) {
        self.cursor = cursor;
        self.cursor_changed = true;
    }

    pub fn set_page(&mut self, page: usize) {
        self.effects.push(Effect::SetPage(page));
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count {
            self.set_page(self.page + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(page) = self.page.checked_sub(1) {
            self.set_page(page);
        }
    }

    /// Redraw this menu for all viewers, re-querying dynamic content.
    pub fn redraw(&mut self) {
        self.effects.push(Effect::Redraw);
    }

    /// Redraw this menu for all viewers on the next tick.
    pub fn redraw_later(&mut self) {
        self.effects.push(Effect::DeferredRedraw);
    }

    /// Show another menu to this viewer.
    pub fn open(&mut self, menu: MenuId) {
        self.effects.push(Effect::Open(menu));
    }

    pub fn go_back(&mut self, close_if_empty: bool) {
        self.effects.push(Effect::GoBack { close_if_empty });
    }

    pub fn close(&mut self, clear_history: bool) {
        self.effects.push(Effect::Close { clear_history });
    }

    /// Replace what the clicked slot shows.
    pub fn set_current_item(&mut self, item: Option<ItemStack>) {
        self.current = item.clone();
        self.effects.push(Effect::SetCurrentItem(item));
    }

    pub fn message(&mut self, text: impl Into<String>) {
        self.effects.push(Effect::Message(text.into()));
    }

    pub(crate) fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// New cursor if the action replaced it.
    pub(crate) fn take_cursor(&mut self) -> Option<Option<ItemStack>> {
        self.cursor_changed.then(|| self.cursor.take())
    }
}

/// What the host must do with the raw interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Do not apply the raw interaction.
    pub cancelled: bool,
    /// The viewer's display was resynced.
    pub resync: bool,
    /// Replace the cursor with this.
    pub cursor: Option<Option<ItemStack>>,
    /// Error text of a failed action, already logged.
    pub failure: Option<String>,
}

impl ClickOutcome {
    /// The engine does not care about this interaction.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            resync: true,
            ..Self::default()
        }
    }

    pub(crate) fn failed(failure: String) -> Self {
        Self {
            failure: Some(failure),
            ..Self::cancelled()
        }
    }
}

/// Context passed to a menu's close action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseContext {
    pub menu: MenuId,
    pub viewer: ViewerId,
}
