//! Pagination calculator.

use std::rc::Rc;

use crate::element::Element;
use crate::render::Scope;

/// Pages needed to show `content` entries in `slots` slots.
pub(crate) fn pages_for(content: usize, slots: usize) -> usize {
    if slots == 0 || content == 0 {
        return 0;
    }
    content.div_ceil(slots)
}

/// Largest page count any element needs. Elements without slots or
/// without content do not contribute; a menu of such elements has no
/// pages at all.
pub(crate) fn page_count(elements: &[Rc<Element>], scope: &mut Scope<'_>) -> usize {
    elements
        .iter()
        .map(|element| {
            let slots = element.slots().len();
            if slots == 0 {
                return 0;
            }
            pages_for(element.content_size(scope), slots)
        })
        .max()
        .unwrap_or(0)
}

pub(crate) fn clamp_page(page: usize, page_count: usize) -> usize {
    page.min(page_count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pages_for_edges() {
        assert_eq!(pages_for(0, 5), 0);
        assert_eq!(pages_for(5, 0), 0);
        assert_eq!(pages_for(5, 5), 1);
        assert_eq!(pages_for(6, 5), 2);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(4, 3), 2);
        assert_eq!(clamp_page(1, 3), 1);
        assert_eq!(clamp_page(2, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_group_page_count(children in 1usize..200, slots in 1usize..54) {
            let expected = if slots < children { children.div_ceil(slots) } else { 1 };
            prop_assert_eq!(pages_for(children, slots), expected);
        }

        #[test]
        fn prop_clamped_page_is_in_range(page in 0usize..500, count in 1usize..50) {
            let clamped = clamp_page(page, count);
            prop_assert!(clamped < count);
            prop_assert_eq!(clamped, page.min(count - 1));
        }
    }
}
