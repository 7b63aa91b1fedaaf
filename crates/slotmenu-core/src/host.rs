//! Collaborator interface the engine drives.
//!
//! The engine never owns the host: every operation that touches containers
//! receives it as `&mut dyn Host`. Host callbacks must not call back into
//! the engine; interaction events are delivered through
//! [`Engine::handle_click`](crate::Engine::handle_click) and friends.

use slotmenu_model::{ContainerHandle, ContainerShape, ItemStack, ViewerId};

/// Scheduler region a deferred task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The global (main thread) region.
    Global,
    /// The region that currently owns this viewer.
    Viewer(ViewerId),
}

/// Container, inventory and scheduling primitives of the host.
pub trait Host {
    /// Create a container for `viewer`. `size` equals the shape's default
    /// size unless the layout has more or fewer rows.
    fn create_container(
        &mut self,
        viewer: ViewerId,
        shape: ContainerShape,
        size: usize,
        title: &str,
    ) -> ContainerHandle;

    fn clear(&mut self, container: ContainerHandle);

    fn get_item(&self, container: ContainerHandle, slot: usize) -> Option<ItemStack>;

    fn set_item(&mut self, container: ContainerHandle, slot: usize, item: Option<ItemStack>);

    /// Viewers currently looking at `container`.
    fn viewers(&self, container: ContainerHandle) -> Vec<ViewerId>;

    /// Show `container` to `viewer`, replacing whatever was open.
    ///
    /// Replacing a container must not produce a close event; the engine
    /// tears down the replaced menu session itself.
    fn open(&mut self, viewer: ViewerId, container: ContainerHandle);

    /// Close the viewer's open container without emitting a close event.
    fn close(&mut self, viewer: ViewerId);

    /// Container the viewer has open, if any.
    fn open_container(&self, viewer: ViewerId) -> Option<ContainerHandle>;

    /// Push the viewer's real inventory state to their client again.
    fn resync(&mut self, viewer: ViewerId);

    fn player_inventory_size(&self, viewer: ViewerId) -> usize;

    fn player_item(&self, viewer: ViewerId, index: usize) -> Option<ItemStack>;

    fn set_player_item(&mut self, viewer: ViewerId, index: usize, item: Option<ItemStack>);

    /// Add items to the viewer's inventory, dropping what does not fit.
    fn give(&mut self, viewer: ViewerId, item: ItemStack);

    fn send_message(&mut self, viewer: ViewerId, message: &str);

    /// Ask the host to call [`Engine::run_region`](crate::Engine::run_region)
    /// for `region` on its next tick.
    fn schedule(&mut self, region: Region);

    /// First empty slot of a container.
    fn first_empty(&self, container: ContainerHandle, size: usize) -> Option<usize> {
        (0..size).find(|slot| self.get_item(container, *slot).is_none())
    }

    /// Whether the viewer's personal inventory has an empty slot.
    fn player_has_space(&self, viewer: ViewerId) -> bool {
        (0..self.player_inventory_size(viewer)).any(|index| self.player_item(viewer, index).is_none())
    }
}
