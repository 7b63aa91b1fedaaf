//! Data model shared by the slot menu engine and its hosts.
//!
//! This crate holds the plain value types a menu is built from. It contains
//! no dispatch logic, so host adapters can depend on it without pulling in
//! the engine.
//!
//! # Contents
//!
//! - **Identity**: [`ViewerId`], [`OwnerId`], [`MenuId`], [`ElementId`] and
//!   the opaque [`ContainerHandle`] a host hands out for a created container
//! - **Items**: [`ItemStack`] with stack merging, plus the shared
//!   [`ItemStorage`] a storage proxy exposes a window into
//! - **Layout**: [`Layout`] turns row strings into a padded character grid
//!   and picks the smallest [`ContainerShape`] that fits
//! - **Interaction**: the host's click vocabulary ([`ClickType`],
//!   [`TransferKind`], [`RawSlot`], [`DragKind`])
//!
//! # Example
//!
//! ```
//! use slotmenu_model::{ContainerShape, Layout};
//!
//! let layout = Layout::from_rows(&["  s  ", "ppppp"]).unwrap();
//! assert_eq!(layout.shape(), ContainerShape::Hopper);
//! assert_eq!(layout.slots_of('p'), &[5, 6, 7, 8, 9]);
//! ```

mod error;
mod ids;
mod interaction;
mod item;
mod layout;
mod storage;

pub use error::ModelError;
pub use ids::{ContainerHandle, ElementId, MenuId, OwnerId, ViewerId};
pub use interaction::{ClickType, DragKind, RawSlot, TransferKind};
pub use item::{DEFAULT_MAX_STACK, ItemStack, Material, validate_display_amount};
pub use layout::{ContainerShape, Layout};
pub use storage::{ItemStorage, SharedStorage};
