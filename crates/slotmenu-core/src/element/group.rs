//! Element groups: many children paged through a shared slot set.

use std::rc::Rc;

use super::Element;

/// Horizontal placement of the last, partially filled row of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Ordered children shown one per slot, page by page.
#[derive(Default)]
pub struct Group {
    children: Vec<Rc<Element>>,
    filler: Option<Rc<Element>>,
    alignment: Alignment,
}

/// Outcome of mapping a slot onto a group.
pub(crate) enum Pick<'a> {
    Child(&'a Rc<Element>),
    Filler,
    Nothing,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(Rc::new));
        self
    }

    /// Element shown in slots without a child.
    #[must_use]
    pub fn with_filler(mut self, filler: Element) -> Self {
        self.filler = Some(Rc::new(filler));
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Rc<Element>] {
        &self.children
    }

    pub fn filler(&self) -> Option<&Rc<Element>> {
        self.filler.as_ref()
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Children followed by the filler.
    pub(crate) fn members(&self) -> impl Iterator<Item = &Rc<Element>> {
        self.children.iter().chain(self.filler.iter())
    }

    /// Map a slot of the group (on `page`) onto a child.
    ///
    /// Pages only advance when the group has more children than slots.
    /// Centre and right alignment pack the children of a row that cannot be
    /// filled completely towards the middle or the right edge of that row.
    pub(crate) fn pick(&self, slots: &[usize], slot: usize, page: usize, width: usize) -> Pick<'_> {
        if self.children.is_empty() {
            return Pick::Nothing;
        }
        let Some(position) = slots.iter().position(|candidate| *candidate == slot) else {
            return Pick::Nothing;
        };
        let size = self.children.len() as i64;
        let page = if slots.len() < self.children.len() { page } else { 0 };
        let index = (position + slots.len() * page) as i64;

        let chosen = match self.alignment {
            Alignment::Left => index,
            Alignment::Center | Alignment::Right => {
                let row = slot / width;
                let row_slots: Vec<usize> = slots
                    .iter()
                    .copied()
                    .filter(|candidate| *candidate / width == row)
                    .collect();
                let line_width = row_slots.len() as i64;
                let line_position = row_slots
                    .iter()
                    .position(|candidate| *candidate == slot)
                    .unwrap_or(0) as i64;

                if size - index > line_width - line_position {
                    index
                } else {
                    let remaining = size - (index - line_position);
                    let blank_before = match self.alignment {
                        Alignment::Center => (line_width - remaining) / 2,
                        _ => line_width - remaining,
                    };
                    if line_position < blank_before {
                        return Pick::Filler;
                    }
                    index - blank_before
                }
            }
        };

        match usize::try_from(chosen) {
            Ok(chosen) if chosen < self.children.len() => Pick::Child(&self.children[chosen]),
            _ => Pick::Filler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmenu_model::ItemStack;

    fn group(count: usize, alignment: Alignment) -> Group {
        Group::new()
            .with_children(
                (0..count).map(|n| Element::item('c', ItemStack::new(format!("item{n}"), 1))),
            )
            .with_alignment(alignment)
    }

    /// Child index per slot, `None` for filler or nothing.
    fn picks(group: &Group, slots: &[usize], page: usize, width: usize) -> Vec<Option<usize>> {
        slots
            .iter()
            .map(|slot| match group.pick(slots, *slot, page, width) {
                Pick::Child(child) => group
                    .children()
                    .iter()
                    .position(|candidate| Rc::ptr_eq(candidate, child)),
                Pick::Filler | Pick::Nothing => None,
            })
            .collect()
    }

    #[test]
    fn test_left_alignment_pages() {
        let group = group(5, Alignment::Left);
        let slots = [0, 1, 2];
        assert_eq!(picks(&group, &slots, 0, 3), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(picks(&group, &slots, 1, 3), vec![Some(3), Some(4), None]);
    }

    #[test]
    fn test_page_ignored_when_everything_fits() {
        let group = group(2, Alignment::Left);
        assert_eq!(picks(&group, &[0, 1, 2], 4, 3), vec![Some(0), Some(1), None]);
    }

    #[test]
    fn test_center_alignment_pads_partial_row() {
        let group = group(3, Alignment::Center);
        let slots: Vec<usize> = (0..9).collect();
        assert_eq!(
            picks(&group, &slots, 0, 9),
            vec![None, None, None, Some(0), Some(1), Some(2), None, None, None]
        );
    }

    #[test]
    fn test_right_alignment_pads_partial_row() {
        let group = group(2, Alignment::Right);
        let slots = [0, 1, 2, 3, 4];
        assert_eq!(
            picks(&group, &slots, 0, 5),
            vec![None, None, None, Some(0), Some(1)]
        );
    }

    #[test]
    fn test_center_alignment_keeps_full_rows() {
        let group = group(12, Alignment::Center);
        let slots: Vec<usize> = (0..18).collect();
        let picked = picks(&group, &slots, 0, 9);
        assert_eq!(&picked[..9], &(0..9).map(Some).collect::<Vec<_>>()[..]);
        assert_eq!(
            &picked[9..],
            &[None, None, None, Some(9), Some(10), Some(11), None, None, None]
        );
    }

    #[test]
    fn test_empty_group_has_nothing() {
        let group = Group::new();
        assert!(matches!(group.pick(&[0], 0, 0, 3), Pick::Nothing));
    }

    #[test]
    fn test_foreign_slot_has_nothing() {
        let group = group(1, Alignment::Left);
        assert!(matches!(group.pick(&[0], 5, 0, 3), Pick::Nothing));
    }
}
