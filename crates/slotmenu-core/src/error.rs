//! Engine error types.
//!
//! Construction and lookup failures are returned as [`MenuError`]. Failures
//! inside user callbacks travel as [`anyhow::Error`] and are contained by the
//! click router instead of surfacing here.

use std::path::PathBuf;

use slotmenu_model::{ElementId, MenuId, ModelError};
use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Broad class of an error, for host diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Menu or element could not be built as requested.
    Construction,
    /// A referenced menu does not exist (any more).
    Lookup,
    /// Engine configuration could not be loaded.
    Configuration,
}

/// Error raised by menu construction, registry lookups and configuration.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Layout or display value rejected by the model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The element already belongs to a menu.
    #[error("{element} is already bound to {menu}")]
    AlreadyBound { element: ElementId, menu: MenuId },

    /// An explicit slot lies outside the layout.
    #[error("slot {slot} is outside the menu (size {size})")]
    SlotOutOfRange { slot: usize, size: usize },

    /// A state element was built without states.
    #[error("a state element needs at least one state")]
    NoStates,

    /// A state key that is not part of the element.
    #[error("unknown state '{key}'")]
    UnknownState { key: String },

    /// The menu is not registered with the engine.
    #[error("{menu} is not registered")]
    MenuNotFound { menu: MenuId },

    /// Configuration file could not be read.
    #[error("failed to read engine configuration at {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::EngineConfig`].
    #[error("invalid engine configuration at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

impl MenuError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Model(_)
            | Self::AlreadyBound { .. }
            | Self::SlotOutOfRange { .. }
            | Self::NoStates
            | Self::UnknownState { .. } => ErrorCategory::Construction,
            Self::MenuNotFound { .. } => ErrorCategory::Lookup,
            Self::ConfigIo { .. } | Self::ConfigParse { .. } => ErrorCategory::Configuration,
        }
    }

    /// Optional hint on how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Model(ModelError::NoMatchingShape { .. }) => {
                Some("Keep every row at most 9 characters wide.")
            }
            Self::Model(ModelError::EmptyLayout) => Some("Pass at least one row string."),
            Self::Model(ModelError::InvalidQuantity { .. }) => {
                Some("Display amounts must be between 1 and 64.")
            }
            Self::AlreadyBound { .. } => {
                Some("Build a new element for every menu instead of sharing one.")
            }
            Self::MenuNotFound { .. } => Some("The menu was destroyed or never registered."),
            Self::ConfigParse { .. } => {
                Some("Compare the file with the output of `slotmenu config`.")
            }
            Self::SlotOutOfRange { .. }
            | Self::NoStates
            | Self::UnknownState { .. }
            | Self::ConfigIo { .. } => None,
        }
    }
}
