//! State elements: cycle through named states on click.

use std::cell::Cell;
use std::rc::Rc;

use slotmenu_model::{ItemStack, ViewerId};

use crate::click::Click;
use crate::error::{MenuError, Result};

/// Runs when a click switches to a state.
pub type StateCallback = Rc<dyn Fn(&mut Click) -> anyhow::Result<()>>;

/// Reports the externally tracked state key for a viewer.
pub type StateQuery = Rc<dyn Fn(ViewerId) -> Option<String>>;

/// One named state.
pub struct State {
    key: String,
    display: ItemStack,
    on_enter: Option<StateCallback>,
}

impl State {
    pub fn new(key: impl Into<String>, display: ItemStack) -> Self {
        Self {
            key: key.into(),
            display,
            on_enter: None,
        }
    }

    #[must_use]
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Click) -> anyhow::Result<()> + 'static,
    {
        self.on_enter = Some(Rc::new(callback));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display(&self) -> &ItemStack {
        &self.display
    }

    pub(crate) fn callback(&self) -> Option<StateCallback> {
        self.on_enter.clone()
    }
}

/// Ordered states with a current position.
pub struct StateElement {
    states: Vec<State>,
    current: Cell<usize>,
    query: Option<StateQuery>,
}

impl StateElement {
    /// States starting at `default_key`.
    ///
    /// # Errors
    ///
    /// [`MenuError::NoStates`] for an empty list, [`MenuError::UnknownState`]
    /// if no state has the default key.
    pub fn new(default_key: &str, states: Vec<State>) -> Result<Self> {
        if states.is_empty() {
            return Err(MenuError::NoStates);
        }
        let current = index_of(&states, default_key).ok_or_else(|| MenuError::UnknownState {
            key: default_key.to_string(),
        })?;
        Ok(Self {
            states,
            current: Cell::new(current),
            query: None,
        })
    }

    /// States starting at the first one.
    pub fn from_states(states: Vec<State>) -> Result<Self> {
        let key = states
            .first()
            .map(|state| state.key.clone())
            .ok_or(MenuError::NoStates)?;
        Self::new(&key, states)
    }

    /// Read the current key from an outside source before every use.
    #[must_use]
    pub fn with_query<F>(mut self, query: F) -> Self
    where
        F: Fn(ViewerId) -> Option<String> + 'static,
    {
        self.query = Some(Rc::new(query));
        self
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Current state, synced from the query if there is one.
    pub fn current(&self, viewer: ViewerId) -> &State {
        self.sync(viewer);
        &self.states[self.current.get()]
    }

    pub fn current_key(&self, viewer: ViewerId) -> &str {
        self.current(viewer).key()
    }

    /// Advance to the next state, wrapping around.
    pub fn next_state(&self, viewer: ViewerId) -> &State {
        self.sync(viewer);
        let next = (self.current.get() + 1) % self.states.len();
        self.current.set(next);
        &self.states[next]
    }

    /// Step back to the previous state, wrapping around.
    pub fn previous_state(&self, viewer: ViewerId) -> &State {
        self.sync(viewer);
        let previous = self
            .current
            .get()
            .checked_sub(1)
            .unwrap_or(self.states.len() - 1);
        self.current.set(previous);
        &self.states[previous]
    }

    /// # Errors
    ///
    /// [`MenuError::UnknownState`] if no state has `key`.
    pub fn set_state(&self, key: &str) -> Result<()> {
        let index = index_of(&self.states, key).ok_or_else(|| MenuError::UnknownState {
            key: key.to_string(),
        })?;
        self.current.set(index);
        Ok(())
    }

    fn sync(&self, viewer: ViewerId) {
        let Some(query) = &self.query else {
            return;
        };
        if let Some(key) = query(viewer) {
            match index_of(&self.states, &key) {
                Some(index) => self.current.set(index),
                None => tracing::debug!(key = %key, "queried state key is unknown"),
            }
        }
    }
}

fn index_of(states: &[State], key: &str) -> Option<usize> {
    states.iter().position(|state| state.key == key)
}
