//! Seeds and soil for the Zen Garden simulation.
//!
//! This crate models what can be grown and where it grows: the read-only
//! seed catalog and the 3x3 plot grid with its per-cell growth state machine.
//! Nothing here touches money, stock, or persistence.
//!
//! # Modules
//!
//! - [`catalog`] -- [`SeedDefinition`] records and the validated
//!   [`SeedCatalog`] registry with lookup and legacy name resolution.
//! - [`error`] -- Error types for catalog and plot operations.
//! - [`plot`] -- The [`PlotGrid`] state machine: planting, time-based
//!   growth, harvesting with regrowth, and digging up.
//! - [`starting_catalog`] -- Default carrot, tomato, and corn definitions.

pub mod catalog;
pub mod error;
pub mod plot;
pub mod starting_catalog;

// Re-export primary types at crate root.
pub use catalog::{GrowthStage, SeedCatalog, SeedDefinition, SellValue};
pub use error::WorldError;
pub use plot::{HarvestOutcome, PlotGrid, growth_progress};
pub use starting_catalog::{default_seed_definitions, starting_catalog};
