//! Storage proxies: a window into an external item storage.

use std::rc::Rc;

use slotmenu_model::{ElementId, ItemStack, SharedStorage};

/// What a validator is asked about.
#[derive(Debug, Clone, Copy)]
pub struct ValidatorInfo<'a> {
    pub element: ElementId,
    pub slot: usize,
    pub item: Option<&'a ItemStack>,
}

/// Place or take predicate. Absent validators allow everything.
pub type Validator = Rc<dyn Fn(&ValidatorInfo<'_>) -> bool>;

/// Runs after the backing storage was written.
pub type Commit = Rc<dyn Fn() -> anyhow::Result<()>>;

/// Exposes slots of a [`SharedStorage`] in the menu.
///
/// Without a fixed index the n-th slot of the element on page p shows
/// storage index `n + p * slots`.
pub struct StorageProxy {
    storage: SharedStorage,
    fixed_index: Option<usize>,
    place: Option<Validator>,
    take: Option<Validator>,
    commit: Option<Commit>,
}

impl StorageProxy {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            fixed_index: None,
            place: None,
            take: None,
            commit: None,
        }
    }

    /// Always show one storage index, whatever the slot or page.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.fixed_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_place_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&ValidatorInfo<'_>) -> bool + 'static,
    {
        self.place = Some(Rc::new(validator));
        self
    }

    #[must_use]
    pub fn with_take_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&ValidatorInfo<'_>) -> bool + 'static,
    {
        self.take = Some(Rc::new(validator));
        self
    }

    #[must_use]
    pub fn with_commit<F>(mut self, commit: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.commit = Some(Rc::new(commit));
        self
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn fixed_index(&self) -> Option<usize> {
        self.fixed_index
    }

    pub fn size(&self) -> usize {
        self.storage.borrow().size()
    }

    /// Storage index for `slot`, or `None` outside the storage.
    pub(crate) fn index_for(&self, slots: &[usize], slot: usize, page: usize) -> Option<usize> {
        let index = match self.fixed_index {
            Some(index) => index,
            None => {
                let position = slots.iter().position(|candidate| *candidate == slot)?;
                position + slots.len() * page
            }
        };
        (index < self.size()).then_some(index)
    }

    pub fn can_place(&self, element: ElementId, slot: usize, item: Option<&ItemStack>) -> bool {
        self.place
            .as_ref()
            .is_none_or(|validator| validator(&ValidatorInfo { element, slot, item }))
    }

    pub fn can_take(&self, element: ElementId, slot: usize, item: Option<&ItemStack>) -> bool {
        self.take
            .as_ref()
            .is_none_or(|validator| validator(&ValidatorInfo { element, slot, item }))
    }

    pub(crate) fn item_at(&self, index: usize) -> Option<ItemStack> {
        self.storage.borrow().get(index).cloned()
    }

    /// Validate and write `item` at `index`, then commit.
    pub(crate) fn write(
        &self,
        element: ElementId,
        slot: usize,
        index: Option<usize>,
        item: Option<ItemStack>,
    ) -> anyhow::Result<bool> {
        let Some(index) = index else {
            return Ok(false);
        };
        let item = item.and_then(ItemStack::non_empty);
        if !self.can_place(element, slot, item.as_ref()) {
            tracing::trace!(%element, slot, "place validator refused item");
            return Ok(false);
        }
        self.set_and_commit(index, item)
    }

    /// Write without the place validator, for items whose removal was
    /// already take-validated.
    pub(crate) fn replace(&self, index: usize, item: Option<ItemStack>) -> anyhow::Result<()> {
        self.set_and_commit(index, item).map(|_| ())
    }

    /// A failed commit puts the previous item back before returning.
    fn set_and_commit(&self, index: usize, item: Option<ItemStack>) -> anyhow::Result<bool> {
        let previous = self.item_at(index);
        if !self.storage.borrow_mut().set(index, item) {
            return Ok(false);
        }
        if let Err(error) = self.commit() {
            self.storage.borrow_mut().set(index, previous);
            return Err(error);
        }
        Ok(true)
    }

    fn commit(&self) -> anyhow::Result<()> {
        match &self.commit {
            Some(commit) => commit(),
            None => Ok(()),
        }
    }
}
