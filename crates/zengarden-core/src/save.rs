//! On-disk save schema and reconciliation against the current catalog.
//!
//! A save is one JSON object. Writing always produces the current shape: a
//! flat, row-major, nine-entry `plot` with camelCase plant fields. Reading
//! also accepts older saves:
//!
//! - a 3x3 nested `plot` array
//! - `name` (display name) instead of `seedId`
//! - `plantedTime` and `harvestsLeft` instead of `plantedAt` and
//!   `harvestsRemaining`, with `-1` meaning unbounded harvests
//! - missing `isMultiHarvest`, `harvestsRemaining`, shop, or tool fields
//!
//! Reconciliation never fails. Cells whose seed has left the catalog are
//! dropped, and fields absent from the save are refilled from the current
//! seed definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use zengarden_economy::{HarvestLedger, Inventory, ShopEconomy};
use zengarden_types::{
    CellPos, EpochMillis, Harvests, HarvestedItem, PlantInstance, SHOVEL, SeedId, ToolId,
};
use zengarden_world::{PlotGrid, SeedCatalog, SeedDefinition};

use crate::state::{GameState, default_tools};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// The persisted save blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    /// Coins on hand.
    #[serde(default)]
    pub money: Option<u64>,
    /// Plot cells.
    #[serde(default)]
    pub plot: PlotLayout,
    /// Owned seeds by seed id.
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
    /// Unsold harvests in ledger order.
    #[serde(default)]
    pub harvested_items: Vec<SavedHarvest>,
    /// Shop stock by seed id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_stock: Option<BTreeMap<String, u32>>,
    /// Time of the last shop restock (epoch ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restock_time: Option<EpochMillis>,
    /// Owned tools, keyed by tool id. Values are opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<BTreeMap<String, serde_json::Value>>,
    /// Selected seed id.
    #[serde(default)]
    pub selected_seed_id: Option<String>,
    /// Selected tool id.
    #[serde(default)]
    pub selected_tool: Option<String>,
}

/// Plot cells in either the current flat layout or the legacy 3x3 layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlotLayout {
    /// Rows of cells, as written by older versions.
    Nested(Vec<Vec<Option<SavedPlant>>>),
    /// Nine cells, row-major.
    Flat(Vec<Option<SavedPlant>>),
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl PlotLayout {
    /// Occupied cells with their positions. Out-of-grid entries are ignored.
    fn into_cells(self) -> Vec<(CellPos, SavedPlant)> {
        let indexed: Vec<(Option<CellPos>, Option<SavedPlant>)> = match self {
            Self::Flat(cells) => cells
                .into_iter()
                .enumerate()
                .map(|(index, cell)| (CellPos::from_index(index), cell))
                .collect(),
            Self::Nested(rows) => rows
                .into_iter()
                .enumerate()
                .flat_map(|(row, cells)| {
                    cells.into_iter().enumerate().map(move |(col, cell)| {
                        let pos = u8::try_from(row)
                            .ok()
                            .zip(u8::try_from(col).ok())
                            .and_then(|(r, c)| CellPos::new(r, c));
                        (pos, cell)
                    })
                })
                .collect(),
        };
        indexed
            .into_iter()
            .filter_map(|(pos, cell)| match (pos, cell) {
                (Some(pos), Some(plant)) => Some((pos, plant)),
                (None, Some(_)) => {
                    warn!("Ignoring saved plant outside the 3x3 grid");
                    None
                }
                (_, None) => None,
            })
            .collect()
    }
}

/// A persisted plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlant {
    /// Seed id, or a display name in legacy saves.
    #[serde(alias = "name")]
    pub seed_id: String,
    /// Start of the current growth cycle (epoch ms).
    #[serde(alias = "plantedTime")]
    pub planted_at: EpochMillis,
    /// Whether the current cycle has completed.
    #[serde(default)]
    pub is_grown: bool,
    /// Whether the plant regrows after harvest.
    #[serde(default)]
    pub is_multi_harvest: Option<bool>,
    /// Harvest credits left.
    #[serde(default, alias = "harvestsLeft")]
    pub harvests_remaining: Option<Harvests>,
    /// Completed harvests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvests_taken: Option<u32>,
}

/// A persisted harvested item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedHarvest {
    /// Seed id, or a display name in legacy saves.
    #[serde(alias = "name")]
    pub seed_id: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Coins the item sells for.
    pub sell_value: u64,
    /// When it was harvested (epoch ms).
    #[serde(default)]
    pub harvested_at: EpochMillis,
}

// ---------------------------------------------------------------------------
// State -> save
// ---------------------------------------------------------------------------

impl SaveFile {
    /// Capture the durable subset of `state`.
    pub fn capture(state: &GameState) -> Self {
        let plot = state
            .plot
            .iter()
            .map(|(_, plant)| plant.map(SavedPlant::from))
            .collect();
        Self {
            money: Some(state.money),
            plot: PlotLayout::Flat(plot),
            inventory: string_keyed(state.inventory.counts()),
            harvested_items: state
                .ledger
                .items()
                .iter()
                .map(SavedHarvest::from)
                .collect(),
            shop_stock: Some(string_keyed(state.shop.stock_levels())),
            last_restock_time: Some(state.shop.last_restock_time()),
            tools: Some(
                state
                    .tools
                    .iter()
                    .map(|tool| {
                        (
                            tool.as_str().to_owned(),
                            serde_json::Value::Object(serde_json::Map::new()),
                        )
                    })
                    .collect(),
            ),
            selected_seed_id: state.selected_seed.as_ref().map(|id| id.as_str().to_owned()),
            selected_tool: state.selected_tool.as_ref().map(|id| id.as_str().to_owned()),
        }
    }
}

fn string_keyed(map: &BTreeMap<SeedId, u32>) -> BTreeMap<String, u32> {
    map.iter()
        .map(|(id, &n)| (id.as_str().to_owned(), n))
        .collect()
}

impl From<&PlantInstance> for SavedPlant {
    fn from(plant: &PlantInstance) -> Self {
        Self {
            seed_id: plant.seed_id.as_str().to_owned(),
            planted_at: plant.planted_at,
            is_grown: plant.is_grown,
            is_multi_harvest: Some(plant.is_multi_harvest),
            harvests_remaining: Some(plant.harvests_remaining),
            harvests_taken: Some(plant.harvests_taken),
        }
    }
}

impl From<&HarvestedItem> for SavedHarvest {
    fn from(item: &HarvestedItem) -> Self {
        Self {
            seed_id: item.seed_id.as_str().to_owned(),
            weight: item.weight,
            sell_value: item.sell_value,
            harvested_at: item.harvested_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Save -> state
// ---------------------------------------------------------------------------

/// Values used for fields a save does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallbacks {
    /// Money for a save without a balance.
    pub money: u64,
    /// Restock time for a save without one; usually "now".
    pub last_restock_time: EpochMillis,
}

impl SaveFile {
    /// Rebuild a full game state against the current catalog.
    pub fn reconcile(self, catalog: &SeedCatalog, fallbacks: Fallbacks) -> GameState {
        let mut dropped = 0_usize;
        let plants: Vec<(CellPos, PlantInstance)> = self
            .plot
            .into_cells()
            .into_iter()
            .filter_map(|(pos, saved)| {
                let Some(def) = catalog.resolve(&saved.seed_id) else {
                    warn!(%pos, seed = %saved.seed_id, "Dropping saved plant with unknown seed");
                    dropped = dropped.saturating_add(1);
                    return None;
                };
                Some((pos, restore_plant(saved, def)))
            })
            .collect();

        let inventory = Inventory::from_counts(&resolve_keys(&self.inventory, catalog), catalog);

        let ledger = HarvestLedger::from_items(
            self.harvested_items
                .into_iter()
                .map(|saved| restore_harvest(saved, catalog))
                .collect(),
        );

        let shop = ShopEconomy::from_parts(
            &self
                .shop_stock
                .map(|stock| resolve_keys(&stock, catalog))
                .unwrap_or_default(),
            self.last_restock_time.unwrap_or(fallbacks.last_restock_time),
            catalog,
        );

        let mut tools = default_tools();
        if let Some(saved) = self.tools {
            tools.extend(
                saved
                    .into_keys()
                    .filter(|id| is_known_tool(id))
                    .map(ToolId::from),
            );
        }

        let selected_seed = self
            .selected_seed_id
            .and_then(|id| catalog.resolve(&id).map(|def| def.id.clone()))
            .filter(|id| inventory.has(id.as_str()));
        let selected_tool = self
            .selected_tool
            .filter(|id| tools.contains(id.as_str()))
            .map(ToolId::from);

        debug!(
            plants = plants.len(),
            dropped,
            items = ledger.len(),
            "Save reconciled"
        );

        GameState {
            money: self.money.unwrap_or(fallbacks.money),
            plot: PlotGrid::from_plants(plants),
            inventory,
            ledger,
            shop,
            selected_seed,
            selected_tool,
            tools,
        }
    }
}

fn is_known_tool(id: &str) -> bool {
    id == SHOVEL
}

fn restore_plant(saved: SavedPlant, def: &SeedDefinition) -> PlantInstance {
    let is_multi_harvest = saved.is_multi_harvest.unwrap_or(def.is_multi_harvest);
    let harvests_remaining = if is_multi_harvest {
        saved
            .harvests_remaining
            .filter(|&h| h != Harvests::Finite(0))
            .unwrap_or_else(|| def.initial_harvests())
    } else {
        Harvests::ONCE
    };
    let harvests_taken = saved.harvests_taken.unwrap_or_else(|| {
        match (def.harvest_count.remaining(), harvests_remaining.remaining()) {
            (Some(original), Some(left)) => original.saturating_sub(left),
            _ => 0,
        }
    });
    PlantInstance {
        seed_id: def.id.clone(),
        planted_at: saved.planted_at,
        is_grown: saved.is_grown,
        harvests_remaining,
        is_multi_harvest,
        harvests_taken,
    }
}

fn restore_harvest(saved: SavedHarvest, catalog: &SeedCatalog) -> HarvestedItem {
    let seed_id = catalog
        .resolve(&saved.seed_id)
        .map_or_else(|| SeedId::from(saved.seed_id), |def| def.id.clone());
    HarvestedItem {
        seed_id,
        weight: saved.weight,
        sell_value: saved.sell_value,
        harvested_at: saved.harvested_at,
    }
}

fn resolve_keys(map: &BTreeMap<String, u32>, catalog: &SeedCatalog) -> BTreeMap<SeedId, u32> {
    map.iter()
        .filter_map(|(key, &n)| catalog.resolve(key).map(|def| (def.id.clone(), n)))
        .collect()
}
