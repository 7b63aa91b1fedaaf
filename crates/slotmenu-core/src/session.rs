//! Per-viewer runtime state of a menu.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmenu_model::{ContainerHandle, ElementId, ViewerId};

use crate::element::Element;

/// Cached result of a dynamic query.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub delegate: Option<Rc<Element>>,
    pub cached_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| now.saturating_duration_since(self.cached_at) > ttl)
    }
}

/// Dynamic delegates of one viewer, keyed by the dynamic element's id.
#[derive(Debug, Default)]
pub(crate) struct DynamicCache {
    entries: HashMap<ElementId, CacheEntry>,
}

impl DynamicCache {
    pub fn get(&self, id: ElementId) -> Option<&CacheEntry> {
        self.entries.get(&id)
    }

    /// Store a fresh delegate. Entries of dynamic elements nested in the
    /// replaced delegate can no longer be reached and are dropped.
    pub fn store(&mut self, id: ElementId, delegate: Option<Rc<Element>>, now: Instant) {
        let previous = self.entries.insert(
            id,
            CacheEntry {
                delegate,
                cached_at: now,
            },
        );
        if let Some(old) = previous.and_then(|entry| entry.delegate) {
            self.prune(&old);
        }
    }

    fn prune(&mut self, element: &Element) {
        let mut pending = Vec::new();
        element.dynamic_ids(&mut pending);
        while let Some(id) = pending.pop() {
            if let Some(delegate) = self.entries.remove(&id).and_then(|entry| entry.delegate) {
                delegate.dynamic_ids(&mut pending);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// State of one viewer of a menu.
#[derive(Debug)]
pub(crate) struct ViewerSession {
    pub container: Option<ContainerHandle>,
    pub page: usize,
    pub page_count: usize,
    pub cache: DynamicCache,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self {
            container: None,
            page: 0,
            page_count: 1,
            cache: DynamicCache::default(),
        }
    }
}

/// Sessions of all viewers of a menu.
#[derive(Debug, Default)]
pub(crate) struct SessionRegistry {
    sessions: HashMap<ViewerId, ViewerSession>,
}

impl SessionRegistry {
    pub fn get(&self, viewer: ViewerId) -> Option<&ViewerSession> {
        self.sessions.get(&viewer)
    }

    pub fn get_mut(&mut self, viewer: ViewerId) -> Option<&mut ViewerSession> {
        self.sessions.get_mut(&viewer)
    }

    /// Session of `viewer`, created on first use.
    pub fn entry(&mut self, viewer: ViewerId) -> &mut ViewerSession {
        self.sessions.entry(viewer).or_default()
    }

    pub fn remove(&mut self, viewer: ViewerId) -> Option<ViewerSession> {
        self.sessions.remove(&viewer)
    }

    pub fn container(&self, viewer: ViewerId) -> Option<ContainerHandle> {
        self.sessions.get(&viewer).and_then(|session| session.container)
    }

    /// Whether `container` is the one shown to `viewer`.
    pub fn owns(&self, viewer: ViewerId, container: ContainerHandle) -> bool {
        self.container(viewer) == Some(container)
    }

    /// Viewers with a container, in a stable order.
    pub fn viewers(&self) -> Vec<ViewerId> {
        let mut viewers: Vec<ViewerId> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.container.is_some())
            .map(|(viewer, _)| *viewer)
            .collect();
        viewers.sort();
        viewers
    }

    pub fn drain(&mut self) -> Vec<(ViewerId, ViewerSession)> {
        self.sessions.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
