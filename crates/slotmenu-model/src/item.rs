//! Item stacks and material keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Default maximum amount of a stack.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Namespaced material key, e.g. `"stone"` or `"minecraft:red_bundle"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(String);

impl Material {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    /// Whether items of this material carry a nested inventory of their own.
    ///
    /// Transfers involving such items are never simulated.
    pub fn is_container_like(&self) -> bool {
        self.0.to_ascii_lowercase().contains("bundle")
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Material {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Material {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A stack of items as shown in one slot.
///
/// `amount` is deliberately not clamped to `max_stack`: hosts can hand out
/// overfull stacks and the merge logic has to cope with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u32,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

impl ItemStack {
    pub fn new(material: impl Into<Material>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            max_stack: DEFAULT_MAX_STACK,
            name: None,
            lore: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Copy of this stack with a different amount.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Two stacks are similar when they only differ in amount.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material
            && self.max_stack == other.max_stack
            && self.name == other.name
            && self.lore == other.lore
    }

    pub fn is_full(&self) -> bool {
        self.amount >= self.max_stack
    }

    pub fn is_container_like(&self) -> bool {
        self.material.is_container_like()
    }

    /// Drop stacks that have run out of items.
    pub fn non_empty(self) -> Option<Self> {
        (self.amount > 0).then_some(self)
    }

    /// Move as much of `other` into this stack as fits below `max_stack`.
    ///
    /// Returns the amount left in `other`, or `None` if the stacks are not
    /// similar and nothing was moved.
    pub fn absorb(&mut self, other: &mut ItemStack) -> Option<u32> {
        if !self.is_similar(other) {
            return None;
        }
        let space = self.max_stack.saturating_sub(self.amount);
        let moved = space.min(other.amount);
        self.amount += moved;
        other.amount -= moved;
        Some(other.amount)
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.material, self.amount)
    }
}

/// Check a quantity shown on a display item.
///
/// # Errors
///
/// Returns [`ModelError::InvalidQuantity`] outside `1..=64`.
pub fn validate_display_amount(amount: u32) -> Result<u32, ModelError> {
    if (1..=DEFAULT_MAX_STACK).contains(&amount) {
        Ok(amount)
    } else {
        Err(ModelError::InvalidQuantity {
            amount,
            min: 1,
            max: DEFAULT_MAX_STACK,
        })
    }
}
