use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tracing::{debug, info};

use slotmenu_core::EngineConfig;
use slotmenu_model::Layout;

use crate::demo::{DemoStep, run_demo};

/// Shown instead of the blank layout character.
const BLANK_MARK: &str = "·";

/// Load the engine configuration, or the defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::load_from(path)?;
            debug!(path = %path.display(), "loaded engine configuration");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

pub fn run_layout(rows: &[String]) -> Result<()> {
    let layout = Layout::from_rows(rows).context("resolve layout")?;
    println!("{}", layout_heading(&layout));
    println!("{}", grid_table(&layout));
    println!("{}", slot_table(&layout));
    Ok(())
}

pub fn run_demo_command(config: EngineConfig, viewers: usize) -> Result<()> {
    let steps = run_demo(config, viewers)?;
    for (index, step) in steps.iter().enumerate() {
        println!("Step {}: {}", index + 1, step.title);
        println!("{}", step_table(step));
        if let Some(cursor) = &step.cursor {
            println!("Cursor of viewer 1: {cursor}");
        }
        println!();
    }
    info!(steps = steps.len(), "demo complete");
    Ok(())
}

pub fn run_config(config: &EngineConfig) -> Result<()> {
    let text = config.to_toml().map_err(|message| anyhow!(message))?;
    print!("{text}");
    Ok(())
}

pub fn layout_heading(layout: &Layout) -> String {
    format!(
        "Shape: {} ({} rows x {} slots, {} total)",
        layout.shape(),
        layout.rows(),
        layout.width(),
        layout.size()
    )
}

/// The padded character grid, one table row per container row.
pub fn grid_table(layout: &Layout) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend((0..layout.width()).map(|column| header_cell(&column.to_string())));
    table.set_header(header);
    apply_table_style(&mut table);
    for (row, chars) in layout.grid().iter().enumerate() {
        let mut cells = vec![Cell::new(row).fg(Color::DarkGrey)];
        cells.extend(chars.chars().map(char_cell));
        table.add_row(cells);
    }
    for column in 1..=layout.width() {
        if let Some(column) = table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Center);
        }
    }
    table
}

/// Slots per layout character, blank excluded.
pub fn slot_table(layout: &Layout) -> Table {
    let mut by_char: BTreeMap<char, &[usize]> = BTreeMap::new();
    for ch in layout.chars() {
        if *ch != Layout::BLANK {
            by_char.entry(*ch).or_insert_with(|| layout.slots_of(*ch));
        }
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Char"), header_cell("Slots")]);
    apply_table_style(&mut table);
    for (ch, slots) in by_char {
        let slots = slots
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![char_cell(ch), Cell::new(slots)]);
    }
    table
}

pub fn step_table(step: &DemoStep) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Viewer"),
        header_cell("Menu"),
        header_cell("Page"),
        header_cell("Container"),
    ]);
    apply_table_style(&mut table);
    for view in &step.views {
        let menu = match &view.menu {
            Some(title) => Cell::new(title),
            None => Cell::new("(closed)").fg(Color::DarkGrey),
        };
        let page = format!("{}/{}", view.page + 1, view.page_count.max(1));
        table.add_row(vec![
            Cell::new(&view.label),
            menu,
            Cell::new(page),
            Cell::new(&view.rows),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn char_cell(ch: char) -> Cell {
    if ch == Layout::BLANK {
        Cell::new(BLANK_MARK).fg(Color::DarkGrey)
    } else {
        Cell::new(ch).add_attribute(Attribute::Bold)
    }
}
