//! Errors raised while building model values.

use thiserror::Error;

/// Construction error for layouts and display items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No rows were supplied for the layout.
    #[error("a menu layout needs at least one row")]
    EmptyLayout,

    /// The widest row does not fit any supported container shape.
    #[error("no container shape is {width} slots wide")]
    NoMatchingShape { width: usize },

    /// A display quantity outside the valid stack range.
    #[error("display amount {amount} is outside {min}..={max}")]
    InvalidQuantity { amount: u32, min: u32, max: u32 },
}
