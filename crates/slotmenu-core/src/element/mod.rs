//! Menu elements.
//!
//! An [`Element`] is one unit of menu content bound to the slots whose
//! layout character equals its slot character. The variant-specific part
//! lives in [`ElementKind`]; rendering and click resolution dispatch over it
//! in this module.
//!
//! Elements are immutable once added to a menu except for their one-time
//! [`Binding`] and the current index of a [`StateElement`].

mod display;
mod dynamic;
mod group;
mod state;
mod storage;

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use slotmenu_model::{ElementId, ItemStack, MenuId};

use crate::click::Click;
use crate::error::{MenuError, Result};
use crate::render::Scope;

pub use display::{BackControl, PageControl, Paginator, Static};
pub use dynamic::{Dynamic, Query};
pub use group::{Alignment, Group};
pub use state::{State, StateCallback, StateElement, StateQuery};
pub use storage::{Commit, StorageProxy, Validator, ValidatorInfo};

pub(crate) use group::Pick;

/// Click handler. Returning `Ok(true)` cancels the raw interaction.
pub type Action = Rc<dyn Fn(&mut Click) -> anyhow::Result<bool>>;

/// Menu and slots an element was bound to.
#[derive(Debug, Clone)]
pub struct Binding {
    pub menu: MenuId,
    pub slots: Rc<[usize]>,
}

/// Variant payload of an element.
pub enum ElementKind {
    Static(Static),
    Group(Group),
    Dynamic(Dynamic),
    State(StateElement),
    Storage(StorageProxy),
    Paginator(Paginator),
    Back(BackControl),
}

/// Fieldless mirror of [`ElementKind`] for logs and click contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTag {
    Static,
    Group,
    Dynamic,
    State,
    Storage,
    Paginator,
    Back,
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "static",
            Self::Group => "group",
            Self::Dynamic => "dynamic",
            Self::State => "state",
            Self::Storage => "storage",
            Self::Paginator => "paginator",
            Self::Back => "back",
        };
        f.write_str(name)
    }
}

macro_rules! impl_into_kind {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ElementKind {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_into_kind! {
    Static => Static,
    Group => Group,
    Dynamic => Dynamic,
    State => StateElement,
    Storage => StorageProxy,
    Paginator => Paginator,
    Back => BackControl,
}

/// One unit of menu content.
pub struct Element {
    id: ElementId,
    slot_char: char,
    action: Option<Action>,
    binding: OnceCell<Binding>,
    kind: ElementKind,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("slot_char", &self.slot_char)
            .field("kind", &self.tag())
            .field("has_action", &self.action.is_some())
            .field("binding", &self.binding.get())
            .finish()
    }
}

impl Element {
    pub fn new(slot_char: char, kind: impl Into<ElementKind>) -> Self {
        Self {
            id: ElementId::next(),
            slot_char,
            action: None,
            binding: OnceCell::new(),
            kind: kind.into(),
        }
    }

    /// Static element showing `item`.
    pub fn item(slot_char: char, item: ItemStack) -> Self {
        Self::new(slot_char, Static::new(item))
    }

    /// Attach a click handler. It replaces the variant's built-in handling.
    #[must_use]
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Click) -> anyhow::Result<bool> + 'static,
    {
        self.action = Some(Rc::new(action));
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn slot_char(&self) -> char {
        self.slot_char
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn tag(&self) -> ElementTag {
        match &self.kind {
            ElementKind::Static(_) => ElementTag::Static,
            ElementKind::Group(_) => ElementTag::Group,
            ElementKind::Dynamic(_) => ElementTag::Dynamic,
            ElementKind::State(_) => ElementTag::State,
            ElementKind::Storage(_) => ElementTag::Storage,
            ElementKind::Paginator(_) => ElementTag::Paginator,
            ElementKind::Back(_) => ElementTag::Back,
        }
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.get()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    /// Slots this element is shown in; empty until bound.
    pub fn slots(&self) -> &[usize] {
        self.binding.get().map_or(&[][..], |binding| &binding.slots[..])
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ElementKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_state(&self) -> Option<&StateElement> {
        match &self.kind {
            ElementKind::State(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_storage(&self) -> Option<&StorageProxy> {
        match &self.kind {
            ElementKind::Storage(storage) => Some(storage),
            _ => None,
        }
    }

    /// Associate the element with a menu and its slots.
    ///
    /// Children of a group are bound to the same slots.
    ///
    /// # Errors
    ///
    /// [`MenuError::AlreadyBound`] if the element (or one of its children)
    /// was bound before.
    pub(crate) fn bind(&self, menu: MenuId, slots: Rc<[usize]>) -> Result<()> {
        if let Some(existing) = self.binding.get() {
            return Err(MenuError::AlreadyBound {
                element: self.id,
                menu: existing.menu,
            });
        }
        if let ElementKind::Group(group) = &self.kind {
            for child in group.members() {
                child.bind(menu, Rc::clone(&slots))?;
            }
        }
        self.binding
            .set(Binding { menu, slots })
            .map_err(|_| MenuError::AlreadyBound {
                element: self.id,
                menu,
            })
    }

    /// Item this element shows in `slot` for the scope's viewer.
    pub(crate) fn render(&self, scope: &mut Scope<'_>, slot: usize) -> Option<ItemStack> {
        match &self.kind {
            ElementKind::Static(element) => Some(element.display().clone()),
            ElementKind::Group(group) => {
                match group.pick(self.slots(), slot, scope.page, scope.width) {
                    Pick::Child(child) => child.render(scope, slot),
                    Pick::Filler => group.filler().and_then(|filler| filler.render(scope, slot)),
                    Pick::Nothing => None,
                }
            }
            ElementKind::Dynamic(dynamic) => match dynamic.delegate(self, scope) {
                Ok(Some(delegate)) => delegate.render(scope, slot),
                Ok(None) => None,
                Err(error) => {
                    tracing::warn!(element = %self.id, slot, error = %format!("{error:#}"), "dynamic query failed while rendering");
                    None
                }
            },
            ElementKind::State(state) => Some(state.current(scope.viewer).display().clone()),
            ElementKind::Storage(storage) => storage
                .index_for(self.slots(), slot, scope.page)
                .and_then(|index| storage.item_at(index)),
            ElementKind::Paginator(paginator) => {
                match paginator.visible_item(scope.page, scope.page_count) {
                    Some(item) => Some(item),
                    None => scope.render_filler(self.id, slot),
                }
            }
            ElementKind::Back(back) => {
                if scope.history_depth <= 1 {
                    scope.render_filler(self.id, slot)
                } else {
                    Some(back.display().clone())
                }
            }
        }
    }

    /// Element whose handler answers a click on `slot`.
    ///
    /// Groups and dynamic elements defer to the child or delegate shown in
    /// the slot unless they carry an explicit action themselves.
    pub(crate) fn resolve(
        self: &Rc<Self>,
        scope: &mut Scope<'_>,
        slot: usize,
    ) -> anyhow::Result<Option<Rc<Element>>> {
        if self.action.is_some() {
            return Ok(Some(Rc::clone(self)));
        }
        match &self.kind {
            ElementKind::Group(group) => {
                match group.pick(self.slots(), slot, scope.page, scope.width) {
                    Pick::Child(child) => child.resolve(scope, slot),
                    Pick::Filler => match group.filler() {
                        Some(filler) => filler.resolve(scope, slot),
                        None => Ok(None),
                    },
                    Pick::Nothing => Ok(None),
                }
            }
            ElementKind::Dynamic(dynamic) => match dynamic.delegate(self, scope)? {
                Some(delegate) => delegate.resolve(scope, slot),
                None => Ok(None),
            },
            _ => Ok(Some(Rc::clone(self))),
        }
    }

    /// Re-query dynamic content below this element.
    pub(crate) fn refresh_dynamic(&self, scope: &mut Scope<'_>) -> anyhow::Result<()> {
        match &self.kind {
            ElementKind::Dynamic(dynamic) => dynamic.refresh(self, scope).map(drop),
            ElementKind::Group(group) => {
                for child in group.members() {
                    child.refresh_dynamic(scope)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Number of entries this element pages through.
    pub(crate) fn content_size(&self, scope: &mut Scope<'_>) -> usize {
        match &self.kind {
            ElementKind::Group(group) => group.len(),
            ElementKind::Storage(storage) => storage.size(),
            ElementKind::Dynamic(dynamic) => match dynamic.delegate(self, scope) {
                Ok(Some(delegate)) => delegate.content_size(scope),
                Ok(None) => 0,
                Err(error) => {
                    tracing::warn!(element = %self.id, error = %format!("{error:#}"), "dynamic query failed while paging");
                    0
                }
            },
            _ => 0,
        }
    }

    /// Ids of dynamic elements nested in this one, for cache pruning.
    pub(crate) fn dynamic_ids(&self, out: &mut Vec<ElementId>) {
        match &self.kind {
            ElementKind::Dynamic(_) => out.push(self.id),
            ElementKind::Group(group) => {
                for child in group.members() {
                    child.dynamic_ids(out);
                }
            }
            _ => {}
        }
    }

    /// Backing storage index shown in `slot` on `page`.
    pub fn storage_index(&self, slot: usize, page: usize) -> Option<usize> {
        self.as_storage()
            .and_then(|storage| storage.index_for(self.slots(), slot, page))
    }

    /// Item of the backing storage shown in `slot` on `page`.
    pub fn storage_item(&self, slot: usize, page: usize) -> Option<ItemStack> {
        let storage = self.as_storage()?;
        storage
            .index_for(self.slots(), slot, page)
            .and_then(|index| storage.item_at(index))
    }

    /// Write through to the backing storage.
    ///
    /// Returns `Ok(false)` when the element is no storage proxy, the slot maps
    /// outside the storage, or the place validator refuses the item.
    pub fn set_storage_item(
        &self,
        slot: usize,
        page: usize,
        item: Option<ItemStack>,
    ) -> anyhow::Result<bool> {
        match self.as_storage() {
            Some(storage) => {
                let index = storage.index_for(self.slots(), slot, page);
                storage.write(self.id, slot, index, item)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_bind_is_rejected() {
        let element = Element::item('a', ItemStack::new("stone", 1));
        let menu = MenuId::next();
        element.bind(menu, Rc::from([0usize, 1])).expect("first bind");
        assert_eq!(element.slots(), &[0, 1]);

        let err = element.bind(MenuId::next(), Rc::from([2usize])).unwrap_err();
        assert!(matches!(err, MenuError::AlreadyBound { menu: m, .. } if m == menu));
        assert_eq!(element.slots(), &[0, 1]);
    }

    #[test]
    fn test_group_bind_reaches_children() {
        let group = Group::new()
            .with_child(Element::item('x', ItemStack::new("apple", 1)))
            .with_filler(Element::item('x', ItemStack::new("glass", 1)));
        let element = Element::new('g', group);
        element
            .bind(MenuId::next(), Rc::from([3usize, 4]))
            .expect("bind group");
        let group = element.as_group().expect("group");
        assert!(group.members().all(|child| child.slots() == [3, 4]));
    }

    #[test]
    fn test_tags_follow_kind() {
        assert_eq!(
            Element::item('a', ItemStack::new("stone", 1)).tag(),
            ElementTag::Static
        );
        assert_eq!(Element::new('g', Group::new()).tag(), ElementTag::Group);
        assert_eq!(ElementTag::Paginator.to_string(), "paginator");
    }
}
