//! Backing item storage exposed through storage proxies.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::item::ItemStack;

/// Storage shared between a menu and whoever owns the items.
pub type SharedStorage = Rc<RefCell<ItemStorage>>;

/// Fixed-size list of item slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStorage {
    slots: Vec<Option<ItemStack>>,
}

impl ItemStorage {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn from_items(slots: Vec<Option<ItemStack>>) -> Self {
        Self { slots }
    }

    /// Wrap into a [`SharedStorage`].
    pub fn shared(self) -> SharedStorage {
        Rc::new(RefCell::new(self))
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Replace the item at `index`. Returns `false` when out of range.
    pub fn set(&mut self, index: usize, item: Option<ItemStack>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = item.and_then(ItemStack::non_empty);
                true
            }
            None => false,
        }
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&ItemStack>> {
        self.slots.iter().map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_out_of_range_is_rejected() {
        let mut storage = ItemStorage::new(2);
        assert!(!storage.set(2, Some(ItemStack::new("stone", 1))));
        assert!(storage.set(1, Some(ItemStack::new("stone", 1))));
        assert_eq!(storage.first_empty(), Some(0));
    }

    #[test]
    fn test_zero_amount_is_stored_as_empty() {
        let mut storage = ItemStorage::new(1);
        storage.set(0, Some(ItemStack::new("stone", 0)));
        assert_eq!(storage.get(0), None);
        assert_eq!(storage.first_empty(), Some(0));
    }
}
