//! Menu definitions.
//!
//! A [`Menu`] couples a resolved [`Layout`] with the elements shown in it
//! and the sessions of everyone looking at it. Elements are addressed by
//! id, by layout character and by slot; every slot maps to at most one
//! element.

use std::collections::HashMap;
use std::rc::Rc;

use slotmenu_model::{ElementId, ItemStack, Layout, MenuId, OwnerId, ViewerId};

use crate::click::{Click, CloseContext};
use crate::element::{Action, Element};
use crate::error::{MenuError, Result};
use crate::session::SessionRegistry;

/// Decides what closing a menu does: `true` goes back in the viewer's
/// history, `false` clears it.
pub type CloseAction = Rc<dyn Fn(&CloseContext) -> bool>;

/// A slot menu shown to any number of viewers.
pub struct Menu {
    pub(crate) id: MenuId,
    pub(crate) title: String,
    pub(crate) title_updated: bool,
    pub(crate) layout: Layout,
    pub(crate) elements: HashMap<ElementId, Rc<Element>>,
    pub(crate) by_char: HashMap<char, ElementId>,
    pub(crate) by_slot: Vec<Option<ElementId>>,
    pub(crate) sessions: SessionRegistry,
    pub(crate) owner: Option<OwnerId>,
    pub(crate) outside_action: Option<Action>,
    pub(crate) close_action: Option<CloseAction>,
}

impl Menu {
    /// Menu with the given title and layout rows and no elements.
    ///
    /// # Errors
    ///
    /// Layout errors if the rows match no container shape.
    pub fn new<S: AsRef<str>>(title: impl Into<String>, rows: &[S]) -> Result<Self> {
        let layout = Layout::from_rows(rows)?;
        Ok(Self {
            id: MenuId::next(),
            title: title.into(),
            title_updated: false,
            by_slot: vec![None; layout.size()],
            layout,
            elements: HashMap::new(),
            by_char: HashMap::new(),
            sessions: SessionRegistry::default(),
            owner: None,
            outside_action: None,
            close_action: None,
        })
    }

    pub fn builder<S: AsRef<str>>(title: impl Into<String>, rows: &[S]) -> MenuBuilder {
        MenuBuilder {
            title: title.into(),
            rows: rows.iter().map(|row| row.as_ref().to_string()).collect(),
            elements: Vec::new(),
            filler: None,
            owner: None,
            outside_action: None,
            close_action: None,
        }
    }

    pub fn id(&self) -> MenuId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title. Containers are recreated on the next `show`.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.title_updated = true;
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn size(&self) -> usize {
        self.layout.size()
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Add an element to every slot showing its character.
    ///
    /// An element previously registered for the same character is detached
    /// and returned.
    ///
    /// # Errors
    ///
    /// [`MenuError::AlreadyBound`] if the element belongs to a menu already.
    pub fn add_element(&mut self, element: Element) -> Result<Option<Rc<Element>>> {
        let slot_char = element.slot_char();
        let slots: Rc<[usize]> = Rc::from(self.layout.slots_of(slot_char));
        element.bind(self.id, Rc::clone(&slots))?;
        let id = element.id();

        let replaced = self
            .by_char
            .insert(slot_char, id)
            .and_then(|old| self.detach(old));
        for slot in slots.iter() {
            self.by_slot[*slot] = Some(id);
        }
        self.elements.insert(id, Rc::new(element));
        tracing::debug!(menu = %self.id, element = %id, slot_char = %slot_char, slots = slots.len(), "element added");
        Ok(replaced)
    }

    /// Place an element in exactly one slot, independent of the layout.
    ///
    /// # Errors
    ///
    /// [`MenuError::SlotOutOfRange`] or [`MenuError::AlreadyBound`].
    pub fn set_element(&mut self, slot: usize, element: Element) -> Result<()> {
        if slot >= self.size() {
            return Err(MenuError::SlotOutOfRange {
                slot,
                size: self.size(),
            });
        }
        element.bind(self.id, Rc::from([slot]))?;
        self.remove_element_at(slot);
        let id = element.id();
        self.by_slot[slot] = Some(id);
        self.elements.insert(id, Rc::new(element));
        Ok(())
    }

    /// Remove an element by id.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Rc<Element>> {
        let element = self.detach(id)?;
        if self.by_char.get(&element.slot_char()) == Some(&id) {
            self.by_char.remove(&element.slot_char());
        }
        Some(element)
    }

    /// Remove the element registered for a layout character.
    pub fn remove_element_by_char(&mut self, slot_char: char) -> Option<Rc<Element>> {
        let id = self.by_char.remove(&slot_char)?;
        self.detach(id)
    }

    /// Clear one slot. The element is dropped from the menu once it no
    /// longer occupies any slot.
    pub fn remove_element_at(&mut self, slot: usize) -> Option<Rc<Element>> {
        let id = self.by_slot.get_mut(slot)?.take()?;
        let element = self.elements.get(&id).cloned();
        if !self.by_slot.contains(&Some(id)) {
            self.remove_element(id);
        }
        element
    }

    /// Show `item` in every slot without an element of its own.
    pub fn set_filler(&mut self, item: ItemStack) -> Result<()> {
        self.add_element(Element::item(Layout::BLANK, item))
            .map(drop)
    }

    /// The filler element, if any.
    pub fn filler(&self) -> Option<Rc<Element>> {
        self.element_by_char(Layout::BLANK)
    }

    pub fn element(&self, id: ElementId) -> Option<Rc<Element>> {
        self.elements.get(&id).cloned()
    }

    pub fn element_by_char(&self, slot_char: char) -> Option<Rc<Element>> {
        self.by_char.get(&slot_char).and_then(|id| self.element(*id))
    }

    /// Element occupying `slot`.
    pub fn element_at(&self, slot: usize) -> Option<Rc<Element>> {
        self.by_slot
            .get(slot)
            .copied()
            .flatten()
            .and_then(|id| self.element(id))
    }

    /// All elements, ordered by id.
    pub fn elements(&self) -> Vec<Rc<Element>> {
        let mut elements: Vec<Rc<Element>> = self.elements.values().cloned().collect();
        elements.sort_by_key(|element| element.id());
        elements
    }

    /// Element id per slot.
    pub fn slot_map(&self) -> &[Option<ElementId>] {
        &self.by_slot
    }

    /// Handle clicks outside the container.
    pub fn set_outside_action<F>(&mut self, action: F)
    where
        F: Fn(&mut Click) -> anyhow::Result<bool> + 'static,
    {
        self.outside_action = Some(Rc::new(action));
    }

    pub fn set_close_action<F>(&mut self, action: F)
    where
        F: Fn(&CloseContext) -> bool + 'static,
    {
        self.close_action = Some(Rc::new(action));
    }

    pub(crate) fn set_owner(&mut self, owner: Option<OwnerId>) {
        self.owner = owner;
    }

    /// Viewers with a live container.
    pub fn viewers(&self) -> Vec<ViewerId> {
        self.sessions.viewers()
    }

    pub fn page(&self, viewer: ViewerId) -> usize {
        self.sessions.get(viewer).map_or(0, |session| session.page)
    }

    pub fn page_count(&self, viewer: ViewerId) -> usize {
        self.sessions.get(viewer).map_or(1, |session| session.page_count)
    }

    fn detach(&mut self, id: ElementId) -> Option<Rc<Element>> {
        let element = self.elements.remove(&id)?;
        for slot in self.by_slot.iter_mut() {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        tracing::debug!(menu = %self.id, element = %id, "element removed");
        Some(element)
    }
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("shape", &self.layout.shape())
            .field("elements", &self.elements.len())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

/// Collects everything a menu is built from; errors surface in
/// [`MenuBuilder::build`].
pub struct MenuBuilder {
    title: String,
    rows: Vec<String>,
    elements: Vec<Element>,
    filler: Option<ItemStack>,
    owner: Option<OwnerId>,
    outside_action: Option<Action>,
    close_action: Option<CloseAction>,
}

impl MenuBuilder {
    #[must_use]
    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    #[must_use]
    pub fn elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    #[must_use]
    pub fn filler(mut self, item: ItemStack) -> Self {
        self.filler = Some(item);
        self
    }

    /// Owner used for the engine's owner lookup and lifecycle events.
    #[must_use]
    pub fn owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn outside_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Click) -> anyhow::Result<bool> + 'static,
    {
        self.outside_action = Some(Rc::new(action));
        self
    }

    #[must_use]
    pub fn close_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&CloseContext) -> bool + 'static,
    {
        self.close_action = Some(Rc::new(action));
        self
    }

    /// # Errors
    ///
    /// Layout errors and element binding errors.
    pub fn build(self) -> Result<Menu> {
        let mut menu = Menu::new(self.title, &self.rows)?;
        if let Some(item) = self.filler {
            menu.set_filler(item)?;
        }
        for element in self.elements {
            menu.add_element(element)?;
        }
        menu.owner = self.owner;
        menu.outside_action = self.outside_action;
        menu.close_action = self.close_action;
        Ok(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> ItemStack {
        ItemStack::new("stone", 1)
    }

    #[test]
    fn test_elements_map_to_their_char_slots() {
        let menu = Menu::builder("Test", &["aba", "ccc"])
            .element(Element::item('a', stone()))
            .element(Element::item('c', stone()))
            .build()
            .expect("menu");
        let a = menu.element_by_char('a').expect("a");
        assert_eq!(a.slots(), &[0, 2]);
        assert_eq!(menu.element_at(2).map(|e| e.id()), Some(a.id()));
        assert!(menu.element_at(1).is_none());
        assert_eq!(menu.element_at(4).map(|e| e.slot_char()), Some('c'));
    }

    #[test]
    fn test_adding_same_char_replaces() {
        let mut menu = Menu::new("Test", &["aaa"]).expect("menu");
        let first = Element::item('a', stone());
        let first_id = first.id();
        assert!(menu.add_element(first).expect("add").is_none());
        let replaced = menu
            .add_element(Element::item('a', ItemStack::new("dirt", 1)))
            .expect("add")
            .expect("replaced");
        assert_eq!(replaced.id(), first_id);
        assert!(menu.element(first_id).is_none());
        assert_eq!(menu.elements().len(), 1);
    }

    #[test]
    fn test_element_from_another_menu_is_rejected() {
        let mut first = Menu::new("One", &["a"]).expect("menu");
        let mut second = Menu::new("Two", &["a"]).expect("menu");
        first
            .add_element(Element::item('a', stone()))
            .expect("add");
        let shared = first.remove_element_by_char('a').expect("element");
        let element = Rc::try_unwrap(shared).expect("sole owner");
        let err = second.add_element(element).unwrap_err();
        assert!(matches!(err, MenuError::AlreadyBound { .. }));
    }

    #[test]
    fn test_set_element_single_slot() {
        let mut menu = Menu::new("Test", &["aaa"]).expect("menu");
        menu.add_element(Element::item('a', stone())).expect("add");
        let extra = Element::item('z', ItemStack::new("gold", 1));
        let extra_id = extra.id();
        menu.set_element(1, extra).expect("set");
        assert_eq!(menu.element_at(1).map(|e| e.id()), Some(extra_id));
        assert_eq!(menu.element_at(0).map(|e| e.slot_char()), Some('a'));

        let err = menu
            .set_element(3, Element::item('z', stone()))
            .unwrap_err();
        assert!(matches!(err, MenuError::SlotOutOfRange { slot: 3, size: 3 }));

        assert_eq!(
            menu.remove_element_at(1).map(|e| e.id()),
            Some(extra_id)
        );
        assert!(menu.element(extra_id).is_none());
    }

    #[test]
    fn test_filler_uses_blank_slots() {
        let menu = Menu::builder("Test", &["a"])
            .filler(ItemStack::new("glass_pane", 1))
            .build()
            .expect("menu");
        assert!(menu.filler().is_some());
        assert_eq!(menu.element_at(0).map(|e| e.slot_char()), Some(' '));
        assert_eq!(menu.element_at(1).map(|e| e.slot_char()), None);
    }

    #[test]
    fn test_invalid_rows_fail() {
        assert!(Menu::new("Wide", &["0123456789"]).is_err());
    }
}
