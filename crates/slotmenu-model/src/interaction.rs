//! Vocabulary of host interactions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mouse or key gesture that produced a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickType {
    Left,
    ShiftLeft,
    Right,
    ShiftRight,
    Middle,
    NumberKey,
    DoubleClick,
    Drop,
    ControlDrop,
    SwapOffhand,
    Other,
}

/// The host's classification of the item movement a click would perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferKind {
    Nothing,
    PickupAll,
    PickupSome,
    PickupHalf,
    PickupOne,
    PlaceAll,
    PlaceSome,
    PlaceOne,
    SwapWithCursor,
    DropAllCursor,
    DropOneCursor,
    DropAllSlot,
    DropOneSlot,
    MoveToOtherInventory,
    HotbarMoveAndReadd,
    HotbarSwap,
    CloneStack,
    CollectToCursor,
    Unknown,
}

impl TransferKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nothing => "NOTHING",
            Self::PickupAll => "PICKUP_ALL",
            Self::PickupSome => "PICKUP_SOME",
            Self::PickupHalf => "PICKUP_HALF",
            Self::PickupOne => "PICKUP_ONE",
            Self::PlaceAll => "PLACE_ALL",
            Self::PlaceSome => "PLACE_SOME",
            Self::PlaceOne => "PLACE_ONE",
            Self::SwapWithCursor => "SWAP_WITH_CURSOR",
            Self::DropAllCursor => "DROP_ALL_CURSOR",
            Self::DropOneCursor => "DROP_ONE_CURSOR",
            Self::DropAllSlot => "DROP_ALL_SLOT",
            Self::DropOneSlot => "DROP_ONE_SLOT",
            Self::MoveToOtherInventory => "MOVE_TO_OTHER_INVENTORY",
            Self::HotbarMoveAndReadd => "HOTBAR_MOVE_AND_READD",
            Self::HotbarSwap => "HOTBAR_SWAP",
            Self::CloneStack => "CLONE_STACK",
            Self::CollectToCursor => "COLLECT_TO_CURSOR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a raw interaction landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSlot {
    /// A slot of the menu's own container.
    Menu(usize),
    /// A slot of the viewer's personal inventory.
    Player(usize),
    /// Outside of any container.
    Outside,
}

/// How a drag distributes the cursor stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    /// One item per slot (right button).
    Single,
    /// Stack split evenly (left button).
    Even,
}
