//! Shared type definitions for the Zen Garden simulation.
//!
//! This crate is the single source of truth for the values that cross the
//! boundary between the engine and the renderer. Types defined here flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for seed and tool identifiers
//! - [`grid`] -- Validated plot coordinates on the 3x3 grid
//! - [`harvests`] -- Finite or infinite harvest credits
//! - [`enums`] -- Cell states, notice kinds, and domain events
//! - [`structs`] -- Plant instances, harvested items, notices, snapshots

pub mod enums;
pub mod grid;
pub mod harvests;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CellState, GameEvent, NoticeKind};
pub use grid::{CELL_COUNT, CellPos, GRID_COLS, GRID_ROWS};
pub use harvests::{Harvests, LEGACY_INFINITE_SENTINEL};
pub use ids::{SHOVEL, SeedId, ToolId};
pub use structs::{CellView, GameSnapshot, HarvestedItem, Notice, PlantInstance};

/// Wall-clock timestamp in milliseconds since the Unix epoch.
pub type EpochMillis = u64;
