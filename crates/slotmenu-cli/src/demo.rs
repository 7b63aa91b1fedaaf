//! Scripted shop session against the in-memory host.
//!
//! A market menu opens a paginated shop backed by a storage proxy. The
//! first viewer turns pages, picks up half a stack, collects to the cursor
//! and goes back while the others watch the shared stock change.

use std::rc::Rc;

use anyhow::{Context, Result, bail};
use slotmenu_core::{
    BackControl, ClickEvent, ClickOutcome, Element, Engine, EngineConfig, Host, MemoryHost, Menu,
    PageControl, Paginator, StorageProxy,
};
use slotmenu_model::{ItemStack, ItemStorage, MenuId, RawSlot, SharedStorage, TransferKind, ViewerId};

const CHEST_SLOT: usize = 2;
const BACK_SLOT: usize = 7;
const NEXT_SLOT: usize = 9;

/// One viewer's screen after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerView {
    pub label: String,
    pub menu: Option<String>,
    pub page: usize,
    pub page_count: usize,
    pub rows: String,
}

/// State of every viewer after one scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoStep {
    pub title: String,
    pub views: Vec<ViewerView>,
    /// Cursor of the acting viewer.
    pub cursor: Option<ItemStack>,
}

struct Shop {
    host: MemoryHost,
    engine: Engine,
    market: MenuId,
    shop: MenuId,
    viewers: Vec<ViewerId>,
    cursor: Option<ItemStack>,
    steps: Vec<DemoStep>,
}

fn stock() -> SharedStorage {
    ItemStorage::from_items(vec![
        Some(ItemStack::new("emerald", 10)),
        Some(ItemStack::new("bread", 4)),
        Some(ItemStack::new("apple", 6)),
        None,
        Some(ItemStack::new("emerald", 20)),
        None,
        Some(ItemStack::new("emerald", 30)),
        Some(ItemStack::new("iron_ingot", 1)),
    ])
    .shared()
}

/// Run the shop script and return the screens after every step.
///
/// # Errors
///
/// Fails if a menu cannot be built or shown, or a click action fails.
pub fn run_demo(config: EngineConfig, viewers: usize) -> Result<Vec<DemoStep>> {
    let mut shop = Shop::new(config, viewers, &stock())?;
    shop.script()?;
    Ok(shop.steps)
}

impl Shop {
    fn new(config: EngineConfig, viewers: usize, stock: &SharedStorage) -> Result<Self> {
        let mut engine = Engine::new(config);

        let shop = Menu::builder("Shop", &["sssss", "< b >"])
            .filler(ItemStack::new("glass_pane", 1))
            .element(Element::new(
                's',
                StorageProxy::new(Rc::clone(stock)).with_commit(|| {
                    tracing::debug!("shop stock saved");
                    Ok(())
                }),
            ))
            .element(Element::new(
                '<',
                Paginator::new(PageControl::Previous, ItemStack::new("arrow", 1)),
            ))
            .element(Element::new(
                '>',
                Paginator::new(PageControl::Next, ItemStack::new("arrow", 1)),
            ))
            .element(Element::new(
                'b',
                BackControl::new(ItemStack::new("oak_door", 1)),
            ))
            .build()
            .context("build shop menu")?;
        let shop = engine.register(shop);

        let market = Menu::builder("Market", &["  c  "])
            .element(
                Element::item('c', ItemStack::new("chest", 1)).with_action(move |click| {
                    click.open(shop);
                    Ok(true)
                }),
            )
            .build()
            .context("build market menu")?;
        let market = engine.register(market);

        Ok(Self {
            host: MemoryHost::new(),
            engine,
            market,
            shop,
            viewers: (0..viewers).map(|_| ViewerId::random()).collect(),
            cursor: None,
            steps: Vec::new(),
        })
    }

    fn script(&mut self) -> Result<()> {
        let acting = *self.viewers.first().context("the demo needs a viewer")?;
        self.host
            .set_player_item(acting, 0, Some(ItemStack::new("emerald", 10)));

        for viewer in self.viewers.clone() {
            self.engine.show(&mut self.host, self.market, viewer)?;
        }
        self.record("Everyone opens the market");

        for viewer in self.viewers.clone() {
            self.click(viewer, CHEST_SLOT, TransferKind::PickupAll)?;
        }
        self.engine.run_pending(&mut self.host);
        self.record("Everyone clicks the chest and enters the shop");

        let outcome = self.click(acting, 0, TransferKind::PickupHalf)?;
        if !outcome.cancelled {
            self.apply_pickup_half(acting, 0)?;
        }
        self.engine.run_pending(&mut self.host);
        self.record("Viewer 1 picks up half of the first stack");

        self.click(acting, NEXT_SLOT, TransferKind::PickupAll)?;
        self.record("Viewer 1 turns to the next page");

        let outcome = self.click(acting, 0, TransferKind::CollectToCursor)?;
        if let Some(cursor) = outcome.cursor {
            self.cursor = cursor;
        }
        self.engine.run_pending(&mut self.host);
        self.record("Viewer 1 double-clicks to collect emeralds");

        self.click(acting, BACK_SLOT, TransferKind::PickupAll)?;
        self.engine.run_pending(&mut self.host);
        self.record("Viewer 1 goes back to the market");

        tracing::info!(
            steps = self.steps.len(),
            viewers = self.viewers.len(),
            "demo finished"
        );
        Ok(())
    }

    /// Click a menu slot of the viewer's open container. Only the acting
    /// viewer carries a cursor.
    fn click(&mut self, viewer: ViewerId, slot: usize, transfer: TransferKind) -> Result<ClickOutcome> {
        let container = self
            .host
            .container_of(viewer)
            .with_context(|| format!("viewer {viewer} has no open container"))?;
        let cursor = if Some(&viewer) == self.viewers.first() {
            self.cursor.clone()
        } else {
            None
        };
        let event = ClickEvent::new(viewer, container, RawSlot::Menu(slot), transfer)
            .with_cursor(cursor)
            .with_current(self.host.get_item(container, slot));
        let outcome = self.engine.handle_click(&mut self.host, &event);
        if let Some(failure) = &outcome.failure {
            bail!("click on slot {slot} failed: {failure}");
        }
        Ok(outcome)
    }

    /// What the host itself does for an uncancelled pickup-half.
    fn apply_pickup_half(&mut self, viewer: ViewerId, slot: usize) -> Result<()> {
        let container = self
            .host
            .container_of(viewer)
            .with_context(|| format!("viewer {viewer} has no open container"))?;
        let Some(item) = self.host.get_item(container, slot) else {
            return Ok(());
        };
        let taken = item.amount.div_ceil(2);
        self.host
            .set_item(container, slot, item.with_amount(item.amount - taken).non_empty());
        self.cursor = Some(item.with_amount(taken));
        Ok(())
    }

    fn record(&mut self, title: &str) {
        let views = self
            .viewers
            .iter()
            .enumerate()
            .map(|(index, viewer)| {
                let open = self.engine.get_open(&self.host, *viewer);
                ViewerView {
                    label: format!("viewer {}", index + 1),
                    menu: open
                        .and_then(|menu| self.engine.menu(menu))
                        .map(|menu| menu.title().to_string()),
                    page: open.map_or(0, |menu| self.engine.get_page(menu, *viewer)),
                    page_count: open.map_or(0, |menu| self.engine.page_count(menu, *viewer)),
                    rows: self.host.view(*viewer),
                }
            })
            .collect();
        self.steps.push(DemoStep {
            title: title.to_string(),
            views,
            cursor: self.cursor.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_is_recorded_for_every_viewer() {
        let steps = run_demo(EngineConfig::default(), 3).expect("demo");
        assert_eq!(steps.len(), 6);
        assert!(steps.iter().all(|step| step.views.len() == 3));
        assert_eq!(steps[0].views[2].menu.as_deref(), Some("Market"));
    }

    #[test]
    fn test_zero_viewers_is_an_error() {
        assert!(run_demo(EngineConfig::default(), 0).is_err());
    }
}
