//! Property tests for layout resolution.

use proptest::prelude::*;
use slotmenu_model::{ContainerShape, Layout};

fn expected_width(longest: usize) -> usize {
    ContainerShape::ALL
        .iter()
        .map(|shape| shape.row_width())
        .find(|width| *width >= longest)
        .unwrap_or(usize::MAX)
}

proptest! {
    #[test]
    fn grid_matches_padded_rows(rows in prop::collection::vec("[a-e ]{0,9}", 1..6)) {
        let layout = Layout::from_rows(&rows).expect("rows up to 9 wide always fit");
        let longest = rows.iter().map(String::len).max().unwrap_or(0);
        let width = expected_width(longest);

        prop_assert_eq!(layout.width(), width);
        prop_assert_eq!(layout.size(), width * rows.len());

        for (index, row) in rows.iter().enumerate() {
            let left = (width - row.len()) / 2;
            for (offset, ch) in row.chars().enumerate() {
                prop_assert_eq!(layout.char_at(index * width + left + offset), Some(ch));
            }
            for pad in 0..left {
                prop_assert_eq!(layout.char_at(index * width + pad), Some(Layout::BLANK));
            }
        }
    }

    #[test]
    fn slot_lookup_is_inverse_of_char_lookup(rows in prop::collection::vec("[a-c]{1,9}", 1..4)) {
        let layout = Layout::from_rows(&rows).expect("layout");
        for slot in 0..layout.size() {
            let ch = layout.char_at(slot).expect("slot in range");
            prop_assert!(layout.slots_of(ch).contains(&slot));
        }
    }

    #[test]
    fn rows_wider_than_a_chest_fail(row in "[a-z]{10,16}") {
        prop_assert!(Layout::from_rows(&[row]).is_err());
    }
}
