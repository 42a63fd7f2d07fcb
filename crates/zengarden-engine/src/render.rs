//! Plain-text rendering of a [`GameSnapshot`] and queued notices.

use std::fmt::Write as _;

use zengarden_types::{CellState, CellView, GameSnapshot, Notice, NoticeKind};
use zengarden_world::SeedCatalog;

/// Width of one grid cell in characters.
const CELL_WIDTH: usize = 16;

/// Draw the whole garden: status line, grid, inventory, shop, and crops.
pub fn render(snapshot: &GameSnapshot, catalog: &SeedCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Money: {} coins | Shop restocks in {}",
        snapshot.money,
        format_duration(snapshot.next_restock_in_ms)
    );
    let selected = snapshot
        .selected_seed_id
        .as_ref()
        .map(|id| format!("seed {}", name(catalog, id.as_str())))
        .or_else(|| {
            snapshot
                .selected_tool
                .as_ref()
                .map(|tool| format!("tool {tool}"))
        })
        .unwrap_or_else(|| String::from("nothing"));
    let _ = writeln!(out, "Selected: {selected}");
    out.push('\n');

    let _ = write!(out, "   ");
    for col in 0..3 {
        let _ = write!(out, "{col:^CELL_WIDTH$}");
    }
    out.push('\n');
    for (row, cells) in snapshot.cells.chunks(3).enumerate() {
        let _ = write!(out, "{row}  ");
        for cell in cells {
            let _ = write!(out, "{:^CELL_WIDTH$}", cell_label(cell, catalog));
        }
        out.push('\n');
    }
    out.push('\n');

    let owned: Vec<String> = snapshot
        .inventory
        .iter()
        .filter(|&(_, &n)| n > 0)
        .map(|(id, n)| format!("{} x{n}", name(catalog, id.as_str())))
        .collect();
    let _ = writeln!(
        out,
        "Seeds: {}",
        if owned.is_empty() {
            String::from("none")
        } else {
            owned.join(", ")
        }
    );

    let _ = writeln!(out, "Shop:");
    for def in catalog.definitions() {
        let stock = snapshot.shop_stock.get(&def.id).copied().unwrap_or(0);
        let _ = writeln!(
            out,
            "  {:<10} {:>5} coins  ({stock} left)",
            def.id.as_str(),
            def.price
        );
    }

    let _ = writeln!(out, "Tools: {}", join_display(&snapshot.tools));

    if snapshot.harvested.is_empty() {
        let _ = writeln!(out, "Harvested crops: none");
    } else {
        let _ = writeln!(out, "Harvested crops:");
        for (index, item) in snapshot.harvested.iter().enumerate() {
            let _ = writeln!(
                out,
                "  [{index}] {} {:.2}kg, {} coins",
                name(catalog, item.seed_id.as_str()),
                item.weight,
                item.sell_value
            );
        }
    }
    out
}

/// One line per notice, prefixed by its tone.
pub fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let marker = match notice.kind {
                NoticeKind::Info => "[i]",
                NoticeKind::Success => "[+]",
                NoticeKind::Error => "[!]",
            };
            format!("{marker} {}", notice.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell_label(cell: &CellView, catalog: &SeedCatalog) -> String {
    let Some(seed_id) = &cell.seed_id else {
        return String::from(".");
    };
    let name = name(catalog, seed_id.as_str());
    match cell.state {
        CellState::Empty => String::from("."),
        CellState::Growing => format!("{name} {}%", percent(cell.progress)),
        CellState::Ready => format!("{name} READY"),
    }
}

fn name<'a>(catalog: &'a SeedCatalog, seed_id: &'a str) -> &'a str {
    catalog
        .find(seed_id)
        .map_or(seed_id, |def| def.display_name.as_str())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(progress: f64) -> u8 {
    (progress.clamp(0.0, 1.0) * 100.0).floor() as u8
}

fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return String::from("none");
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `4m 05s` style countdown.
pub fn format_duration(ms: u64) -> String {
    let secs = ms.div_ceil(1_000);
    format!("{}m {:02}s", secs / 60, secs % 60)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use zengarden_types::{CellPos, HarvestedItem, Harvests, SeedId, ToolId};
    use zengarden_world::starting_catalog;

    use super::*;

    fn empty_cell(pos: CellPos) -> CellView {
        CellView {
            pos,
            state: CellState::Empty,
            seed_id: None,
            progress: 0.0,
            stage: None,
            harvests_remaining: None,
        }
    }

    fn snapshot() -> GameSnapshot {
        let mut cells: Vec<CellView> = CellPos::all().map(empty_cell).collect();
        if let Some(first) = cells.first_mut() {
            first.state = CellState::Growing;
            first.seed_id = Some(SeedId::from("carrot"));
            first.progress = 0.5;
            first.harvests_remaining = Some(Harvests::ONCE);
        }
        GameSnapshot {
            money: 90,
            cells,
            inventory: BTreeMap::from([(SeedId::from("corn"), 2), (SeedId::from("carrot"), 0)]),
            harvested: vec![HarvestedItem {
                seed_id: SeedId::from("tomato"),
                weight: 0.456,
                sell_value: 684,
                harvested_at: 0,
            }],
            shop_stock: BTreeMap::from([(SeedId::from("carrot"), 7)]),
            next_restock_in_ms: 245_000,
            selected_seed_id: Some(SeedId::from("corn")),
            selected_tool: None,
            tools: vec![ToolId::from("shovel")],
        }
    }

    #[test]
    fn renders_grid_and_listings() {
        let catalog = starting_catalog().unwrap();
        let text = render(&snapshot(), &catalog);
        assert!(text.contains("Money: 90 coins | Shop restocks in 4m 05s"));
        assert!(text.contains("Selected: seed Corn"));
        assert!(text.contains("Carrot 50%"));
        assert!(text.contains("Seeds: Corn x2"));
        assert!(!text.contains("Carrot x0"));
        assert!(text.contains("(7 left)"));
        assert!(text.contains("[0] Tomato 0.46kg, 684 coins"));
        assert!(text.contains("Tools: shovel"));
    }

    #[test]
    fn notices_are_marked_by_kind() {
        let text = render_notices(&[Notice::success("ok"), Notice::error("no")]);
        assert_eq!(text, "[+] ok\n[!] no");
    }

    #[test]
    fn durations_round_up_to_whole_seconds() {
        assert_eq!(format_duration(0), "0m 00s");
        assert_eq!(format_duration(1), "0m 01s");
        assert_eq!(format_duration(300_000), "5m 00s");
    }
}
