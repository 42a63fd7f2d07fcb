//! Core value structs: plant instances, harvested items, notices, and the
//! read-only snapshots handed to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CellState, NoticeKind};
use crate::grid::CellPos;
use crate::harvests::Harvests;
use crate::ids::{SeedId, ToolId};

// ---------------------------------------------------------------------------
// PlantInstance
// ---------------------------------------------------------------------------

/// A plant occupying one plot cell.
///
/// Harvest fields are copied from the seed definition at plant time and are
/// never re-derived, so edits to the catalog do not change plants that are
/// already in the ground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantInstance {
    /// The seed this plant grew from.
    pub seed_id: SeedId,
    /// Start of the current growth cycle (epoch ms).
    pub planted_at: u64,
    /// Whether the current cycle has completed.
    pub is_grown: bool,
    /// Harvest credits left, including the upcoming harvest.
    #[ts(type = "number | \"infinite\"")]
    pub harvests_remaining: Harvests,
    /// Whether the plant regrows after harvesting.
    pub is_multi_harvest: bool,
    /// Completed harvests so far; zero during the first growth cycle.
    pub harvests_taken: u32,
}

impl PlantInstance {
    /// A freshly planted seedling.
    pub fn seedling(
        seed_id: SeedId,
        planted_at: u64,
        is_multi_harvest: bool,
        harvests: Harvests,
    ) -> Self {
        Self {
            seed_id,
            planted_at,
            is_grown: false,
            harvests_remaining: if is_multi_harvest { harvests } else { Harvests::ONCE },
            is_multi_harvest,
            harvests_taken: 0,
        }
    }

    /// Whether the plant is in its first growth cycle.
    pub const fn is_first_cycle(&self) -> bool {
        self.harvests_taken == 0
    }

    /// Cell state implied by this plant.
    pub const fn state(&self) -> CellState {
        if self.is_grown {
            CellState::Ready
        } else {
            CellState::Growing
        }
    }
}

// ---------------------------------------------------------------------------
// HarvestedItem
// ---------------------------------------------------------------------------

/// A harvested crop waiting to be sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HarvestedItem {
    /// The seed the crop came from.
    pub seed_id: SeedId,
    /// Weight in kilograms, within the seed's weight range.
    pub weight: f64,
    /// Coins received when sold.
    pub sell_value: u64,
    /// Harvest time (epoch ms).
    pub harvested_at: u64,
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// A short human-readable message for transient display.
///
/// Notices are an output-only side channel; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notice {
    /// Tone of the message.
    pub kind: NoticeKind,
    /// The message text.
    pub message: String,
}

impl Notice {
    /// An informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer snapshots
// ---------------------------------------------------------------------------

/// Read-only view of one plot cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CellView {
    /// Cell address.
    pub pos: CellPos,
    /// Empty, growing or ready.
    pub state: CellState,
    /// Seed in the cell, if any.
    pub seed_id: Option<SeedId>,
    /// Growth progress of the current cycle in `[0, 1]`.
    pub progress: f64,
    /// Visual key of the active growth stage.
    pub stage: Option<String>,
    /// Harvest credits left, if planted.
    #[ts(type = "number | \"infinite\" | null")]
    pub harvests_remaining: Option<Harvests>,
}

/// Read-only view of the whole game for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameSnapshot {
    /// Coins on hand.
    pub money: u64,
    /// All nine cells, row-major.
    pub cells: Vec<CellView>,
    /// Owned seeds per seed id.
    pub inventory: BTreeMap<SeedId, u32>,
    /// Unsold harvested items in ledger order.
    pub harvested: Vec<HarvestedItem>,
    /// Purchasable stock per seed id.
    pub shop_stock: BTreeMap<SeedId, u32>,
    /// Milliseconds until the next restock.
    pub next_restock_in_ms: u64,
    /// Currently selected seed.
    pub selected_seed_id: Option<SeedId>,
    /// Currently selected tool.
    pub selected_tool: Option<ToolId>,
    /// Owned tools.
    pub tools: Vec<ToolId>,
}
