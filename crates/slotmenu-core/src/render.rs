//! Redraw engine: turns a menu and one viewer's session into container
//! contents.

use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmenu_model::{ElementId, ItemStack, ViewerId};

use crate::element::Element;
use crate::host::Host;
use crate::menu::Menu;
use crate::pagination;
use crate::session::DynamicCache;

/// Everything an element needs to render or resolve for one viewer.
pub(crate) struct Scope<'a> {
    pub viewer: ViewerId,
    pub width: usize,
    pub page: usize,
    pub page_count: usize,
    pub history_depth: usize,
    pub filler: Option<Rc<Element>>,
    pub now: Instant,
    pub default_ttl: Option<Duration>,
    pub cache: &'a mut DynamicCache,
}

impl Scope<'_> {
    /// Render the menu filler in place of a hidden control.
    pub fn render_filler(&mut self, caller: ElementId, slot: usize) -> Option<ItemStack> {
        let filler = self.filler.clone()?;
        if filler.id() == caller {
            return None;
        }
        filler.render(self, slot)
    }
}

/// Engine-level inputs of a draw.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RenderContext {
    pub history_depth: usize,
    pub default_ttl: Option<Duration>,
    pub now: Instant,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DrawOptions {
    /// Re-query every dynamic element first.
    pub refresh_dynamic: bool,
    /// Replace the viewer's container with a fresh one.
    pub recreate: bool,
}

impl Menu {
    pub(crate) fn scope(&mut self, viewer: ViewerId, ctx: &RenderContext) -> Scope<'_> {
        let filler = self.filler();
        let width = self.layout.width();
        let session = self.sessions.entry(viewer);
        Scope {
            viewer,
            width,
            page: session.page,
            page_count: session.page_count,
            history_depth: ctx.history_depth,
            filler,
            now: ctx.now,
            default_ttl: ctx.default_ttl,
            cache: &mut session.cache,
        }
    }

    /// Recompute the viewer's page count and clamp the page into it.
    pub(crate) fn update_pages(&mut self, viewer: ViewerId, ctx: &RenderContext) -> usize {
        let elements = self.elements();
        let mut scope = self.scope(viewer, ctx);
        let count = pagination::page_count(&elements, &mut scope);
        let session = self.sessions.entry(viewer);
        session.page_count = count;
        session.page = pagination::clamp_page(session.page, count);
        count
    }

    /// Draw the menu into the viewer's container, creating it if needed.
    pub(crate) fn draw(
        &mut self,
        host: &mut dyn Host,
        viewer: ViewerId,
        ctx: &RenderContext,
        options: DrawOptions,
    ) {
        let menu = self.id;
        if options.refresh_dynamic {
            let elements = self.elements();
            let mut scope = self.scope(viewer, ctx);
            for element in &elements {
                if let Err(error) = element.refresh_dynamic(&mut scope) {
                    tracing::warn!(%menu, element = %element.id(), error = %format!("{error:#}"), "dynamic refresh failed");
                }
            }
        }
        self.update_pages(viewer, ctx);

        let existing = self.sessions.container(viewer);
        let container = match existing {
            Some(container) if !options.recreate => {
                host.clear(container);
                container
            }
            _ => {
                let container =
                    host.create_container(viewer, self.layout.shape(), self.layout.size(), &self.title);
                self.sessions.entry(viewer).container = Some(container);
                container
            }
        };

        let items = self.render_items(viewer, ctx);
        for (slot, item) in items.into_iter().enumerate() {
            if item.is_some() {
                host.set_item(container, slot, item);
            }
        }
        tracing::debug!(
            %menu,
            %viewer,
            %container,
            page = self.page(viewer),
            refresh = options.refresh_dynamic,
            recreated = existing.is_none() || options.recreate,
            "menu drawn"
        );
    }

    /// Item per slot as the viewer currently sees it.
    pub(crate) fn render_items(
        &mut self,
        viewer: ViewerId,
        ctx: &RenderContext,
    ) -> Vec<Option<ItemStack>> {
        let filler = self.filler();
        let elements: Vec<Option<Rc<Element>>> = (0..self.size())
            .map(|slot| self.element_at(slot).or_else(|| filler.clone()))
            .collect();
        let mut scope = self.scope(viewer, ctx);
        elements
            .iter()
            .enumerate()
            .map(|(slot, element)| element.as_ref().and_then(|element| element.render(&mut scope, slot)))
            .collect()
    }
}
