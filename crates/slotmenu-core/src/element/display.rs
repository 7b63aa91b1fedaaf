//! Fixed-display elements: static items and navigation controls.

use slotmenu_model::{DEFAULT_MAX_STACK, ItemStack, validate_display_amount};

use crate::error::Result;

/// Immutable display item.
#[derive(Debug, Clone)]
pub struct Static {
    display: ItemStack,
}

impl Static {
    pub fn new(display: ItemStack) -> Self {
        Self { display }
    }

    /// Show `amount` as the stack size.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` outside `1..=64`.
    pub fn with_number(mut self, amount: u32) -> Result<Self> {
        self.display.amount = validate_display_amount(amount)?;
        Ok(self)
    }

    pub fn display(&self) -> &ItemStack {
        &self.display
    }
}

/// Page a [`Paginator`] jumps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageControl {
    First,
    Previous,
    Next,
    Last,
}

impl PageControl {
    /// Target page, or `None` when there is nowhere to go.
    pub fn target(self, page: usize, page_count: usize) -> Option<usize> {
        match self {
            Self::First => Some(0),
            Self::Previous => page.checked_sub(1),
            Self::Next => (page + 1 < page_count).then_some(page + 1),
            Self::Last => Some(page_count.saturating_sub(1)),
        }
    }

    fn is_hidden(self, page: usize, page_count: usize) -> bool {
        match self {
            Self::First | Self::Last => page_count < 3,
            Self::Next => page + 1 >= page_count,
            Self::Previous => page == 0,
        }
    }
}

/// Page navigation control.
///
/// Hidden controls show the menu filler. The stack size of a visible
/// control shows the page it leads to.
#[derive(Debug, Clone)]
pub struct Paginator {
    control: PageControl,
    display: ItemStack,
}

impl Paginator {
    pub fn new(control: PageControl, display: ItemStack) -> Self {
        Self { control, display }
    }

    pub fn control(&self) -> PageControl {
        self.control
    }

    pub(crate) fn visible_item(&self, page: usize, page_count: usize) -> Option<ItemStack> {
        if self.control.is_hidden(page, page_count) {
            return None;
        }
        let number = match self.control {
            PageControl::First => return Some(self.display.clone()),
            PageControl::Previous => page,
            PageControl::Next => page + 2,
            PageControl::Last => page_count,
        };
        let amount = u32::try_from(number)
            .ok()
            .filter(|amount| (1..=DEFAULT_MAX_STACK).contains(amount))
            .unwrap_or(1);
        Some(self.display.with_amount(amount))
    }
}

/// Returns the viewer to the previous menu in their history.
#[derive(Debug, Clone)]
pub struct BackControl {
    display: ItemStack,
    close_if_empty: bool,
}

impl BackControl {
    pub fn new(display: ItemStack) -> Self {
        Self {
            display,
            close_if_empty: false,
        }
    }

    /// Close the menu when there is nothing to go back to.
    #[must_use]
    pub fn closing_if_empty(mut self) -> Self {
        self.close_if_empty = true;
        self
    }

    pub fn display(&self) -> &ItemStack {
        &self.display
    }

    pub fn close_if_empty(&self) -> bool {
        self.close_if_empty
    }
}
