//! Dynamic elements: content produced per viewer by a query.

use std::rc::Rc;
use std::time::Duration;

use slotmenu_model::ViewerId;

use super::Element;
use crate::render::Scope;

/// Produces the element a viewer sees. `Ok(None)` shows nothing.
pub type Query = Rc<dyn Fn(ViewerId) -> anyhow::Result<Option<Element>>>;

/// Element whose content is queried per viewer and cached in the viewer's
/// session.
pub struct Dynamic {
    query: Query,
    ttl: Option<Duration>,
}

impl Dynamic {
    pub fn new<F>(query: F) -> Self
    where
        F: Fn(ViewerId) -> anyhow::Result<Option<Element>> + 'static,
    {
        Self {
            query: Rc::new(query),
            ttl: None,
        }
    }

    /// Re-query after `ttl` has passed even without an explicit refresh.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Cached delegate, queried when missing or expired.
    pub(crate) fn delegate(
        &self,
        owner: &Element,
        scope: &mut Scope<'_>,
    ) -> anyhow::Result<Option<Rc<Element>>> {
        let ttl = self.ttl.or(scope.default_ttl);
        if let Some(entry) = scope.cache.get(owner.id()) {
            if !entry.is_expired(scope.now, ttl) {
                return Ok(entry.delegate.clone());
            }
        }
        self.refresh(owner, scope)
    }

    /// Query again, bind the result to the owner's slots and refresh any
    /// dynamic content nested inside it.
    pub(crate) fn refresh(
        &self,
        owner: &Element,
        scope: &mut Scope<'_>,
    ) -> anyhow::Result<Option<Rc<Element>>> {
        let delegate = match (self.query)(scope.viewer)? {
            Some(element) => {
                if let Some(binding) = owner.binding() {
                    element.bind(binding.menu, Rc::clone(&binding.slots))?;
                }
                Some(Rc::new(element))
            }
            None => None,
        };
        tracing::trace!(element = %owner.id(), viewer = %scope.viewer, present = delegate.is_some(), "dynamic element queried");
        scope.cache.store(owner.id(), delegate.clone(), scope.now);
        if let Some(delegate) = &delegate {
            delegate.refresh_dynamic(scope)?;
        }
        Ok(delegate)
    }
}
