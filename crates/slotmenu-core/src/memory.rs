//! In-memory host for tests, demos and headless use.
//!
//! Containers are plain slot vectors, every viewer gets a personal
//! inventory and everything the engine asks for (resyncs, messages,
//! scheduling) is recorded so it can be asserted on.

use std::collections::{BTreeMap, HashMap};

use slotmenu_model::{ContainerHandle, ContainerShape, ItemStack, ViewerId};

use crate::host::{Host, Region};

/// Personal inventory size of a viewer.
pub const PLAYER_INVENTORY_SIZE: usize = 36;

#[derive(Debug, Clone)]
struct MemoryContainer {
    shape: ContainerShape,
    title: String,
    items: Vec<Option<ItemStack>>,
}

/// [`Host`] implementation that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_handle: u64,
    containers: BTreeMap<ContainerHandle, MemoryContainer>,
    open: HashMap<ViewerId, ContainerHandle>,
    inventories: HashMap<ViewerId, Vec<Option<ItemStack>>>,
    messages: Vec<(ViewerId, String)>,
    resyncs: Vec<ViewerId>,
    scheduled: Vec<Region>,
    dropped: Vec<(ViewerId, ItemStack)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container_of(&self, viewer: ViewerId) -> Option<ContainerHandle> {
        self.open.get(&viewer).copied()
    }

    pub fn title(&self, container: ContainerHandle) -> Option<&str> {
        self.containers.get(&container).map(|entry| entry.title.as_str())
    }

    pub fn shape(&self, container: ContainerHandle) -> Option<ContainerShape> {
        self.containers.get(&container).map(|entry| entry.shape)
    }

    pub fn items(&self, container: ContainerHandle) -> Vec<Option<ItemStack>> {
        self.containers
            .get(&container)
            .map(|entry| entry.items.clone())
            .unwrap_or_default()
    }

    /// Container contents as text, one line per row. Slots read
    /// `material*amount`, empty slots `-`.
    pub fn render_rows(&self, container: ContainerHandle) -> String {
        let Some(entry) = self.containers.get(&container) else {
            return String::new();
        };
        let width = entry.shape.row_width();
        entry
            .items
            .chunks(width)
            .map(|row| {
                row.iter()
                    .map(|item| item.as_ref().map_or_else(|| "-".to_string(), ToString::to_string))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Rows of the container the viewer has open.
    pub fn view(&self, viewer: ViewerId) -> String {
        self.container_of(viewer)
            .map(|container| self.render_rows(container))
            .unwrap_or_default()
    }

    pub fn inventory(&self, viewer: ViewerId) -> Vec<Option<ItemStack>> {
        self.inventories
            .get(&viewer)
            .cloned()
            .unwrap_or_else(|| vec![None; PLAYER_INVENTORY_SIZE])
    }

    pub fn messages(&self) -> &[(ViewerId, String)] {
        &self.messages
    }

    pub fn resyncs(&self, viewer: ViewerId) -> usize {
        self.resyncs.iter().filter(|resynced| **resynced == viewer).count()
    }

    /// Regions scheduled since the last call.
    pub fn take_scheduled(&mut self) -> Vec<Region> {
        std::mem::take(&mut self.scheduled)
    }

    /// Items that did not fit into a viewer's inventory.
    pub fn dropped(&self) -> &[(ViewerId, ItemStack)] {
        &self.dropped
    }

    /// Number of containers created so far.
    pub fn created(&self) -> usize {
        self.containers.len()
    }

    /// Stand-in for the viewer dismissing the container themselves. The
    /// caller forwards the returned handle to `Engine::handle_close`.
    pub fn dismiss(&mut self, viewer: ViewerId) -> Option<ContainerHandle> {
        self.open.remove(&viewer)
    }

    fn inventory_mut(&mut self, viewer: ViewerId) -> &mut Vec<Option<ItemStack>> {
        self.inventories
            .entry(viewer)
            .or_insert_with(|| vec![None; PLAYER_INVENTORY_SIZE])
    }
}

impl Host for MemoryHost {
    fn create_container(
        &mut self,
        _viewer: ViewerId,
        shape: ContainerShape,
        size: usize,
        title: &str,
    ) -> ContainerHandle {
        self.next_handle += 1;
        let handle = ContainerHandle(self.next_handle);
        self.containers.insert(
            handle,
            MemoryContainer {
                shape,
                title: title.to_string(),
                items: vec![None; size],
            },
        );
        handle
    }

    fn clear(&mut self, container: ContainerHandle) {
        if let Some(entry) = self.containers.get_mut(&container) {
            entry.items.iter_mut().for_each(|slot| *slot = None);
        }
    }

    fn get_item(&self, container: ContainerHandle, slot: usize) -> Option<ItemStack> {
        self.containers
            .get(&container)
            .and_then(|entry| entry.items.get(slot).cloned().flatten())
    }

    fn set_item(&mut self, container: ContainerHandle, slot: usize, item: Option<ItemStack>) {
        if let Some(target) = self
            .containers
            .get_mut(&container)
            .and_then(|entry| entry.items.get_mut(slot))
        {
            *target = item;
        }
    }

    fn viewers(&self, container: ContainerHandle) -> Vec<ViewerId> {
        let mut viewers: Vec<ViewerId> = self
            .open
            .iter()
            .filter(|(_, open)| **open == container)
            .map(|(viewer, _)| *viewer)
            .collect();
        viewers.sort();
        viewers
    }

    fn open(&mut self, viewer: ViewerId, container: ContainerHandle) {
        self.open.insert(viewer, container);
    }

    fn close(&mut self, viewer: ViewerId) {
        self.open.remove(&viewer);
    }

    fn open_container(&self, viewer: ViewerId) -> Option<ContainerHandle> {
        self.container_of(viewer)
    }

    fn resync(&mut self, viewer: ViewerId) {
        self.resyncs.push(viewer);
    }

    fn player_inventory_size(&self, _viewer: ViewerId) -> usize {
        PLAYER_INVENTORY_SIZE
    }

    fn player_item(&self, viewer: ViewerId, index: usize) -> Option<ItemStack> {
        self.inventories
            .get(&viewer)
            .and_then(|inventory| inventory.get(index).cloned().flatten())
    }

    fn set_player_item(&mut self, viewer: ViewerId, index: usize, item: Option<ItemStack>) {
        if let Some(slot) = self.inventory_mut(viewer).get_mut(index) {
            *slot = item.and_then(ItemStack::non_empty);
        }
    }

    fn give(&mut self, viewer: ViewerId, item: ItemStack) {
        let mut item = item;
        let inventory = self.inventory_mut(viewer);
        for slot in inventory.iter_mut().flatten() {
            if item.amount == 0 {
                break;
            }
            slot.absorb(&mut item);
        }
        if item.amount > 0 {
            if let Some(slot) = inventory.iter_mut().find(|slot| slot.is_none()) {
                *slot = Some(item);
                return;
            }
            self.dropped.push((viewer, item));
        }
    }

    fn send_message(&mut self, viewer: ViewerId, message: &str) {
        self.messages.push((viewer, message.to_string()));
    }

    fn schedule(&mut self, region: Region) {
        self.scheduled.push(region);
    }
}
