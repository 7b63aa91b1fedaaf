//! Slot menu engine.
//!
//! Menus are grids of slots laid out from row strings, filled with
//! [`Element`]s and shown to any number of viewers through a [`Host`] that
//! owns the real containers. The [`Engine`] keeps every menu, the viewers'
//! back-navigation history and the queue of work deferred to the next
//! host tick.
//!
//! # Modules
//!
//! - **Elements**: static items, groups, dynamic and state elements,
//!   storage proxies and the page/back controls
//! - **Menu**: element placement by layout character or slot, filler,
//!   title, per-viewer sessions
//! - **Router**: click, drag and close handling, including the storage
//!   transfer simulation and collect-to-cursor
//! - **Host**: the collaborator trait plus [`MemoryHost`] for tests and
//!   headless runs
//!
//! # Example
//!
//! ```
//! use slotmenu_core::{Element, Engine, EngineConfig, MemoryHost, Menu};
//! use slotmenu_model::{ItemStack, ViewerId};
//!
//! let mut host = MemoryHost::new();
//! let mut engine = Engine::new(EngineConfig::default());
//! let menu = Menu::builder("Shop", &["  a  "])
//!     .element(Element::item('a', ItemStack::new("apple", 3)))
//!     .build()
//!     .unwrap();
//! let menu = engine.register(menu);
//!
//! let viewer = ViewerId::random();
//! engine.show(&mut host, menu, viewer).unwrap();
//! assert_eq!(engine.get_open(&host, viewer), Some(menu));
//! assert_eq!(host.view(viewer), "- - apple*3 - -");
//! ```

mod click;
mod collect;
mod config;
mod element;
mod engine;
mod error;
mod event;
mod history;
mod host;
mod memory;
mod menu;
mod pagination;
mod render;
mod router;
mod session;
mod transfer;

pub use click::{Click, ClickOutcome, CloseContext};
pub use config::{Capabilities, DynamicSettings, EngineConfig, TransferSettings};
pub use element::{
    Action, Alignment, BackControl, Binding, Commit, Dynamic, Element, ElementKind, ElementTag,
    Group, PageControl, Paginator, Query, State, StateCallback, StateElement, StateQuery, Static,
    StorageProxy, Validator, ValidatorInfo,
};
pub use engine::Engine;
pub use error::{ErrorCategory, MenuError, Result};
pub use event::{ClickEvent, CloseEvent, DragEvent};
pub use host::{Host, Region};
pub use memory::{MemoryHost, PLAYER_INVENTORY_SIZE};
pub use menu::{CloseAction, Menu, MenuBuilder};
