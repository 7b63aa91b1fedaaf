//! The engine: menu registry, owner lookup, history and deferred tasks.
//!
//! All state lives in one [`Engine`] value that the host keeps next to its
//! own event loop. Every call that touches containers borrows the host for
//! the duration of the call only.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use slotmenu_model::{ContainerHandle, ItemStack, MenuId, OwnerId, ViewerId};

use crate::click::CloseContext;
use crate::config::EngineConfig;
use crate::error::{MenuError, Result};
use crate::history::History;
use crate::host::{Host, Region};
use crate::menu::Menu;
use crate::render::{DrawOptions, RenderContext};

/// Work deferred to the next tick of a scheduler region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Task {
    Redraw {
        menu: MenuId,
        viewer: ViewerId,
        refresh_dynamic: bool,
    },
    RedrawAll {
        menu: MenuId,
        refresh_dynamic: bool,
    },
    Open {
        menu: MenuId,
        viewer: ViewerId,
    },
    Close {
        viewer: ViewerId,
    },
    /// Put back what a container showed before the host changed it.
    SetSlots {
        viewer: ViewerId,
        container: ContainerHandle,
        items: Vec<(usize, Option<ItemStack>)>,
    },
}

impl Task {
    fn menu(&self) -> Option<MenuId> {
        match self {
            Self::Redraw { menu, .. } | Self::RedrawAll { menu, .. } | Self::Open { menu, .. } => {
                Some(*menu)
            }
            Self::Close { .. } | Self::SetSlots { .. } => None,
        }
    }
}

/// Registry and runtime of all menus.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    pub(crate) menus: HashMap<MenuId, Menu>,
    owners: HashMap<OwnerId, MenuId>,
    pub(crate) history: History,
    tasks: VecDeque<(Region, Task)>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Take ownership of a menu. Its owner, if any, now resolves to it.
    pub fn register(&mut self, menu: Menu) -> MenuId {
        let id = menu.id();
        if let Some(owner) = menu.owner() {
            self.owners.insert(owner, id);
        }
        tracing::debug!(menu = %id, title = %menu.title(), size = menu.size(), "menu registered");
        self.menus.insert(id, menu);
        id
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(&id)
    }

    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.menus.get_mut(&id)
    }

    pub fn menu_ids(&self) -> Vec<MenuId> {
        let mut ids: Vec<MenuId> = self.menus.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Move the owner registration of a menu.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn set_owner(&mut self, id: MenuId, owner: Option<OwnerId>) -> Result<()> {
        let menu = self
            .menus
            .get_mut(&id)
            .ok_or(MenuError::MenuNotFound { menu: id })?;
        if let Some(previous) = menu.owner() {
            if self.owners.get(&previous) == Some(&id) {
                self.owners.remove(&previous);
            }
        }
        menu.set_owner(owner);
        if let Some(owner) = owner {
            self.owners.insert(owner, id);
        }
        Ok(())
    }

    pub fn menu_for_owner(&self, owner: OwnerId) -> Option<MenuId> {
        self.owners.get(&owner).copied()
    }

    // =========================================================================
    // Showing and drawing
    // =========================================================================

    /// Show a menu to a viewer.
    ///
    /// Opening while the viewer has any container open is deferred to the
    /// next tick and keeps the history; otherwise the menu becomes the root
    /// of a fresh history.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn show(&mut self, host: &mut dyn Host, menu: MenuId, viewer: ViewerId) -> Result<()> {
        self.show_inner(host, menu, viewer, true, false)
    }

    pub(crate) fn show_inner(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        viewer: ViewerId,
        check_open: bool,
        from_history: bool,
    ) -> Result<()> {
        let recreate = self.menu_entry(menu)?.title_updated;
        let needs_open = recreate || !check_open || self.get_open(host, viewer) != Some(menu);
        let deferred = needs_open && (from_history || host.open_container(viewer).is_some());
        if needs_open && !deferred {
            self.history.clear(viewer);
            self.history.push(viewer, menu);
        }

        let ctx = self.render_context(viewer);
        self.menu_entry(menu)?.draw(
            host,
            viewer,
            &ctx,
            DrawOptions {
                refresh_dynamic: true,
                recreate,
            },
        );
        if deferred {
            self.defer(host, self.region_for(viewer), Task::Open { menu, viewer });
        } else if needs_open {
            self.open_now(host, menu, viewer);
        }
        if let Some(entry) = self.menus.get_mut(&menu) {
            entry.title_updated = false;
        }
        Ok(())
    }

    /// Hand the viewer's container to the host, tearing down whatever menu
    /// it replaces.
    fn open_now(&mut self, host: &mut dyn Host, menu: MenuId, viewer: ViewerId) {
        let ctx = self.render_context(viewer);
        let Some(entry) = self.menus.get_mut(&menu) else {
            return;
        };
        if entry.sessions.container(viewer).is_none() {
            entry.draw(host, viewer, &ctx, DrawOptions::default());
        }
        let Some(container) = entry.sessions.container(viewer) else {
            return;
        };
        if let Some(previous) = host.open_container(viewer) {
            if previous != container {
                self.container_closed(host, viewer, previous);
            }
        }
        host.open(viewer, container);
        tracing::debug!(%menu, %viewer, %container, "menu opened");
    }

    /// Draw one viewer's container.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn draw(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        viewer: ViewerId,
        refresh_dynamic: bool,
    ) -> Result<()> {
        let ctx = self.render_context(viewer);
        self.menu_entry(menu)?.draw(
            host,
            viewer,
            &ctx,
            DrawOptions {
                refresh_dynamic,
                recreate: false,
            },
        );
        Ok(())
    }

    /// Draw the menu for everyone currently looking at it.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn draw_all(&mut self, host: &mut dyn Host, menu: MenuId, refresh_dynamic: bool) -> Result<()> {
        let viewers = self.menu_entry(menu)?.viewers();
        for viewer in viewers {
            self.draw(host, menu, viewer, refresh_dynamic)?;
        }
        Ok(())
    }

    /// Items a viewer currently sees, without touching the host.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn render(&mut self, menu: MenuId, viewer: ViewerId) -> Result<Vec<Option<ItemStack>>> {
        let ctx = self.render_context(viewer);
        let entry = self.menu_entry(menu)?;
        entry.update_pages(viewer, &ctx);
        Ok(entry.render_items(viewer, &ctx))
    }

    // =========================================================================
    // Closing and teardown
    // =========================================================================

    /// Close the viewer's container.
    ///
    /// Without `clear_history` the menu's close action runs, which by
    /// default reopens the previous menu of the viewer's history.
    pub fn close(&mut self, host: &mut dyn Host, viewer: ViewerId, clear_history: bool) {
        if clear_history {
            self.history.clear(viewer);
        }
        let open = host.open_container(viewer);
        host.close(viewer);
        if let Some(container) = open {
            self.container_closed(host, viewer, container);
        }
    }

    /// Close handling for a container that is no longer shown to `viewer`.
    pub(crate) fn container_closed(
        &mut self,
        host: &mut dyn Host,
        viewer: ViewerId,
        container: ContainerHandle,
    ) {
        let Some(menu) = self.menu_of_container(viewer, container) else {
            return;
        };
        if self.history.tail(viewer) == Some(menu) {
            let go_back = self
                .menus
                .get(&menu)
                .and_then(|entry| entry.close_action.clone())
                .is_none_or(|action| action(&CloseContext { menu, viewer }));
            if go_back {
                if let Err(error) = self.go_back(host, viewer) {
                    tracing::warn!(%menu, %viewer, %error, "going back after close failed");
                }
            } else {
                self.history.clear(viewer);
            }
        }

        let Some(entry) = self.menus.get_mut(&menu) else {
            return;
        };
        entry.sessions.remove(viewer);
        host.clear(container);
        for other in host.viewers(container) {
            if other != viewer {
                host.close(other);
                entry.sessions.remove(other);
            }
        }
        tracing::debug!(%menu, %viewer, %container, "menu closed");
    }

    /// Close every viewer and forget the menu.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn destroy(&mut self, host: &mut dyn Host, id: MenuId) -> Result<()> {
        let mut menu = self
            .menus
            .remove(&id)
            .ok_or(MenuError::MenuNotFound { menu: id })?;
        for (viewer, session) in menu.sessions.drain() {
            if let Some(container) = session.container {
                if host.open_container(viewer) == Some(container) {
                    host.close(viewer);
                }
                host.clear(container);
            }
        }
        if let Some(owner) = menu.owner() {
            if self.owners.get(&owner) == Some(&id) {
                self.owners.remove(&owner);
            }
        }
        self.history.forget(id);
        self.tasks.retain(|(_, task)| task.menu() != Some(id));
        tracing::debug!(menu = %id, "menu destroyed");
        Ok(())
    }

    // =========================================================================
    // Pages
    // =========================================================================

    pub fn get_page(&self, menu: MenuId, viewer: ViewerId) -> usize {
        self.menus.get(&menu).map_or(0, |entry| entry.page(viewer))
    }

    pub fn page_count(&self, menu: MenuId, viewer: ViewerId) -> usize {
        self.menus.get(&menu).map_or(1, |entry| entry.page_count(viewer))
    }

    /// Switch the viewer to `page`, clamped to the pages available, and
    /// redraw their container.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] for unknown menus.
    pub fn set_page(
        &mut self,
        host: &mut dyn Host,
        menu: MenuId,
        viewer: ViewerId,
        page: usize,
    ) -> Result<()> {
        let ctx = self.render_context(viewer);
        let entry = self.menu_entry(menu)?;
        entry.sessions.entry(viewer).page = page;
        let count = entry.update_pages(viewer, &ctx);
        tracing::debug!(%menu, %viewer, requested = page, page = entry.page(viewer), count, "page changed");
        if entry.sessions.container(viewer).is_some() {
            entry.draw(host, viewer, &ctx, DrawOptions::default());
        }
        Ok(())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Menu whose container the viewer has open.
    pub fn get_open(&self, host: &dyn Host, viewer: ViewerId) -> Option<MenuId> {
        host.open_container(viewer)
            .and_then(|container| self.menu_of_container(viewer, container))
    }

    /// Return to the previous menu of the viewer's history.
    ///
    /// Returns `false` when there is nothing to go back to.
    ///
    /// # Errors
    ///
    /// [`MenuError::MenuNotFound`] if the previous menu is gone.
    pub fn go_back(&mut self, host: &mut dyn Host, viewer: ViewerId) -> Result<bool> {
        match self.history.pop(viewer) {
            Some(previous) => {
                self.show_inner(host, previous, viewer, false, true)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear_history(&mut self, viewer: ViewerId) {
        self.history.clear(viewer);
    }

    pub fn history_depth(&self, viewer: ViewerId) -> usize {
        self.history.depth(viewer)
    }

    /// Menus of the viewer's history, oldest first.
    pub fn history(&self, viewer: ViewerId) -> Vec<MenuId> {
        self.history.entries(viewer)
    }

    // =========================================================================
    // Owner lifecycle
    // =========================================================================

    /// The owner is gone; its menu goes with it. Returns whether a menu was
    /// destroyed.
    pub fn owner_destroyed(&mut self, host: &mut dyn Host, owner: OwnerId) -> bool {
        match self.menu_for_owner(owner) {
            Some(menu) => self.destroy(host, menu).is_ok(),
            None => false,
        }
    }

    /// The owner's items changed outside the menu; redraw it next tick.
    pub fn owner_contents_changed(&mut self, host: &mut dyn Host, owner: OwnerId) {
        if let Some(menu) = self.menu_for_owner(owner) {
            self.defer(
                host,
                Region::Global,
                Task::RedrawAll {
                    menu,
                    refresh_dynamic: false,
                },
            );
        }
    }

    // =========================================================================
    // Deferred tasks
    // =========================================================================

    /// Run the tasks queued for `region` so far. Tasks queued while running
    /// wait for the next call.
    pub fn run_region(&mut self, host: &mut dyn Host, region: Region) -> usize {
        let (due, rest): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|(queued, _)| *queued == region);
        self.tasks = rest;
        let count = due.len();
        for (_, task) in due {
            self.run_task(host, task);
        }
        count
    }

    /// Run every queued task regardless of region.
    pub fn run_pending(&mut self, host: &mut dyn Host) -> usize {
        let due = std::mem::take(&mut self.tasks);
        let count = due.len();
        for (_, task) in due {
            self.run_task(host, task);
        }
        count
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn defer(&mut self, host: &mut dyn Host, region: Region, task: Task) {
        tracing::trace!(?region, ?task, "task deferred");
        self.tasks.push_back((region, task));
        host.schedule(region);
    }

    pub(crate) fn region_for(&self, viewer: ViewerId) -> Region {
        if self.config.capabilities.multi_region {
            Region::Viewer(viewer)
        } else {
            Region::Global
        }
    }

    fn run_task(&mut self, host: &mut dyn Host, task: Task) {
        match task {
            Task::Redraw {
                menu,
                viewer,
                refresh_dynamic,
            } => {
                let has_container = self
                    .menus
                    .get(&menu)
                    .is_some_and(|entry| entry.sessions.container(viewer).is_some());
                if has_container {
                    if let Err(error) = self.draw(host, menu, viewer, refresh_dynamic) {
                        tracing::debug!(%error, "skipped redraw");
                    }
                }
            }
            Task::RedrawAll {
                menu,
                refresh_dynamic,
            } => {
                if let Err(error) = self.draw_all(host, menu, refresh_dynamic) {
                    tracing::debug!(%error, "skipped redraw");
                }
            }
            Task::Open { menu, viewer } => {
                if !self.menus.contains_key(&menu) {
                    return;
                }
                let has_container = self
                    .menus
                    .get(&menu)
                    .is_some_and(|entry| entry.sessions.container(viewer).is_some());
                // Controls that depend on the history depth need a fresh draw.
                if self.history.push(viewer, menu) && has_container {
                    if let Err(error) = self.draw(host, menu, viewer, false) {
                        tracing::debug!(%error, "skipped redraw");
                    }
                }
                self.open_now(host, menu, viewer);
            }
            Task::Close { viewer } => self.close(host, viewer, false),
            Task::SetSlots {
                viewer,
                container,
                items,
            } => {
                if host.open_container(viewer) == Some(container) {
                    for (slot, item) in items {
                        host.set_item(container, slot, item);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub(crate) fn menu_of_container(
        &self,
        viewer: ViewerId,
        container: ContainerHandle,
    ) -> Option<MenuId> {
        self.menus
            .values()
            .find(|menu| menu.sessions.owns(viewer, container))
            .map(Menu::id)
    }

    fn menu_entry(&mut self, menu: MenuId) -> Result<&mut Menu> {
        self.menus
            .get_mut(&menu)
            .ok_or(MenuError::MenuNotFound { menu })
    }

    pub(crate) fn render_context(&self, viewer: ViewerId) -> RenderContext {
        RenderContext {
            history_depth: self.history.depth(viewer),
            default_ttl: self.config.dynamic.default_ttl(),
            now: Instant::now(),
        }
    }
}
