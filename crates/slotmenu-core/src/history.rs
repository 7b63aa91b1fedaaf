//! Per-viewer back-navigation stacks.

use std::collections::{HashMap, VecDeque};

use slotmenu_model::{MenuId, ViewerId};

#[derive(Debug, Default)]
pub(crate) struct History {
    stacks: HashMap<ViewerId, VecDeque<MenuId>>,
}

impl History {
    /// Append `menu` unless it already is the tail. Returns whether the
    /// stack grew.
    pub fn push(&mut self, viewer: ViewerId, menu: MenuId) -> bool {
        let stack = self.stacks.entry(viewer).or_default();
        if stack.back() == Some(&menu) {
            return false;
        }
        stack.push_back(menu);
        tracing::debug!(%viewer, %menu, depth = stack.len(), "history push");
        true
    }

    /// Drop the tail and return the menu now on top.
    pub fn pop(&mut self, viewer: ViewerId) -> Option<MenuId> {
        let stack = self.stacks.get_mut(&viewer)?;
        stack.pop_back();
        let tail = stack.back().copied();
        if stack.is_empty() {
            self.stacks.remove(&viewer);
        }
        tracing::debug!(%viewer, tail = ?tail, "history pop");
        tail
    }

    pub fn tail(&self, viewer: ViewerId) -> Option<MenuId> {
        self.stacks.get(&viewer).and_then(|stack| stack.back().copied())
    }

    pub fn depth(&self, viewer: ViewerId) -> usize {
        self.stacks.get(&viewer).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self, viewer: ViewerId) {
        if self.stacks.remove(&viewer).is_some() {
            tracing::debug!(%viewer, "history cleared");
        }
    }

    /// Remove a destroyed menu from every stack, collapsing neighbours that
    /// become equal.
    pub fn forget(&mut self, menu: MenuId) {
        for stack in self.stacks.values_mut() {
            let mut kept: VecDeque<MenuId> = VecDeque::with_capacity(stack.len());
            for entry in stack.drain(..) {
                if entry != menu && kept.back() != Some(&entry) {
                    kept.push_back(entry);
                }
            }
            *stack = kept;
        }
        self.stacks.retain(|_, stack| !stack.is_empty());
    }

    pub fn entries(&self, viewer: ViewerId) -> Vec<MenuId> {
        self.stacks
            .get(&viewer)
            .map(|stack| stack.iter().copied().collect())
            .unwrap_or_default()
    }
}
