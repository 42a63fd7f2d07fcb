//! Enumeration types shared between the engine and the renderer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grid::CellPos;
use crate::ids::{SeedId, ToolId};
use crate::structs::HarvestedItem;

// ---------------------------------------------------------------------------
// Plot cell state
// ---------------------------------------------------------------------------

/// Observable state of one plot cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CellState {
    /// Nothing planted.
    Empty,
    /// A plant is growing and cannot be harvested yet.
    Growing,
    /// A plant is fully grown and can be harvested.
    Ready,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Tone of a player-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// An action succeeded.
    Success,
    /// An action failed or something went wrong.
    Error,
}

// ---------------------------------------------------------------------------
// Domain events
// ---------------------------------------------------------------------------

/// A state change produced by an action or tick.
///
/// The renderer subscribes to these to know what to redraw; it never reads
/// mutable engine state directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GameEvent {
    /// A seed was bought from the shop.
    SeedPurchased {
        /// The purchased seed.
        seed_id: SeedId,
        /// Coins paid.
        price: u64,
    },
    /// A seed was planted in an empty cell.
    Planted {
        /// Target cell.
        pos: CellPos,
        /// The planted seed.
        seed_id: SeedId,
    },
    /// A growing plant became ready to harvest.
    Grown {
        /// The cell that transitioned.
        pos: CellPos,
    },
    /// A ready plant was harvested.
    Harvested {
        /// The harvested cell.
        pos: CellPos,
        /// The item appended to the harvest ledger.
        item: HarvestedItem,
        /// Whether the cell was cleared (`false` means it regrows).
        cleared: bool,
    },
    /// One or more harvested items were sold.
    Sold {
        /// Number of items sold.
        count: u32,
        /// Total coins received.
        total: u64,
    },
    /// The shop stock was refreshed.
    Restocked {
        /// Timestamp of the restock (epoch ms).
        at: u64,
    },
    /// A plant was dug up with the shovel.
    DugUp {
        /// The cleared cell.
        pos: CellPos,
        /// The removed seed.
        seed_id: SeedId,
    },
    /// The selected seed changed.
    SeedSelected {
        /// New selection, `None` when deselected.
        seed_id: Option<SeedId>,
    },
    /// The selected tool changed.
    ToolSelected {
        /// New selection, `None` when deselected.
        tool_id: Option<ToolId>,
    },
}
