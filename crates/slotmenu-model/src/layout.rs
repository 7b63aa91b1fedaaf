//! Layout resolution: row strings to a fixed character grid.
//!
//! Every character of a row names the element shown in that slot. Rows are
//! centred inside the chosen container width and blanks become the filler.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Supported container shapes, ordered by row width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerShape {
    /// 3 slots per row.
    Dispenser,
    /// 5 slots per row.
    Hopper,
    /// 9 slots per row.
    Chest,
}

impl ContainerShape {
    pub const ALL: [ContainerShape; 3] = [Self::Dispenser, Self::Hopper, Self::Chest];

    pub fn row_width(self) -> usize {
        match self {
            Self::Dispenser => 3,
            Self::Hopper => 5,
            Self::Chest => 9,
        }
    }

    /// Size the host uses when a container is created by shape alone.
    pub fn default_size(self) -> usize {
        match self {
            Self::Dispenser => 9,
            Self::Hopper => 5,
            Self::Chest => 27,
        }
    }
}

impl fmt::Display for ContainerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dispenser => "dispenser",
            Self::Hopper => "hopper",
            Self::Chest => "chest",
        };
        f.write_str(name)
    }
}

/// Resolved slot grid of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: ContainerShape,
    width: usize,
    chars: Vec<char>,
    slots_by_char: HashMap<char, Vec<usize>>,
}

impl Layout {
    /// Character that marks a filler slot.
    pub const BLANK: char = ' ';

    /// Resolve row strings into a grid.
    ///
    /// The width is the longest row, raised to the narrowest shape that can
    /// hold it. Shorter rows are centred with blanks (the extra blank goes to
    /// the right), longer rows are cut.
    ///
    /// # Errors
    ///
    /// [`ModelError::EmptyLayout`] for no rows, [`ModelError::NoMatchingShape`]
    /// when a row is wider than the widest shape.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyLayout);
        }
        let longest = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut width = longest.max(ContainerShape::Dispenser.row_width());
        let mut shape = None;
        for candidate in ContainerShape::ALL {
            width = width.max(candidate.row_width());
            if width == candidate.row_width() {
                shape = Some(candidate);
                break;
            }
        }
        let shape = shape.ok_or(ModelError::NoMatchingShape { width: longest })?;

        let mut chars = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row: Vec<char> = row.as_ref().chars().collect();
            if row.len() >= width {
                chars.extend_from_slice(&row[..width]);
            } else {
                let missing = width - row.len();
                let left = missing / 2;
                chars.extend(std::iter::repeat_n(Self::BLANK, left));
                chars.extend_from_slice(&row);
                chars.extend(std::iter::repeat_n(Self::BLANK, missing - left));
            }
        }

        let mut slots_by_char: HashMap<char, Vec<usize>> = HashMap::new();
        for (slot, ch) in chars.iter().enumerate() {
            slots_by_char.entry(*ch).or_default().push(slot);
        }

        Ok(Self {
            shape,
            width,
            chars,
            slots_by_char,
        })
    }

    pub fn shape(&self) -> ContainerShape {
        self.shape
    }

    /// Slots per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of slots.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    pub fn rows(&self) -> usize {
        self.chars.len() / self.width
    }

    /// Layout character of a slot.
    pub fn char_at(&self, slot: usize) -> Option<char> {
        self.chars.get(slot).copied()
    }

    /// All slots showing `ch`, in ascending order.
    pub fn slots_of(&self, ch: char) -> &[usize] {
        self.slots_by_char.get(&ch).map_or(&[], Vec::as_slice)
    }

    /// Row index of a slot.
    pub fn row_of(&self, slot: usize) -> usize {
        slot / self.width
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// The padded rows, one string per container row.
    pub fn grid(&self) -> Vec<String> {
        self.chars
            .chunks(self.width)
            .map(|row| row.iter().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_pick_dispenser() {
        let layout = Layout::from_rows(&["a", "bc"]).expect("layout");
        assert_eq!(layout.shape(), ContainerShape::Dispenser);
        assert_eq!(layout.width(), 3);
        assert_eq!(layout.grid(), vec![" a ", "bc "]);
    }

    #[test]
    fn test_width_four_rounds_up_to_hopper() {
        let layout = Layout::from_rows(&["abcd"]).expect("layout");
        assert_eq!(layout.shape(), ContainerShape::Hopper);
        assert_eq!(layout.grid(), vec!["abcd "]);
    }

    #[test]
    fn test_chest_centres_rows() {
        let layout = Layout::from_rows(&["xxxxxxxxx", "  p  ", "bbbbbbb"]).expect("layout");
        assert_eq!(layout.shape(), ContainerShape::Chest);
        assert_eq!(layout.size(), 27);
        assert_eq!(layout.rows(), 3);
        assert_eq!(layout.grid()[1], "    p    ");
        assert_eq!(layout.grid()[2], " bbbbbbb ");
        assert_eq!(layout.slots_of('p'), &[13]);
        assert_eq!(layout.row_of(13), 1);
    }

    #[test]
    fn test_too_wide_rows_fail() {
        let err = Layout::from_rows(&["abcdefghij"]).unwrap_err();
        assert_eq!(err, ModelError::NoMatchingShape { width: 10 });
    }

    #[test]
    fn test_empty_layout_fails() {
        let rows: [&str; 0] = [];
        assert_eq!(Layout::from_rows(&rows).unwrap_err(), ModelError::EmptyLayout);
    }

    #[test]
    fn test_unknown_char_has_no_slots() {
        let layout = Layout::from_rows(&["aaa"]).expect("layout");
        assert!(layout.slots_of('z').is_empty());
        assert_eq!(layout.char_at(3), None);
    }
}
