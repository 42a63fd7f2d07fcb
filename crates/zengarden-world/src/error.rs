//! Error types for the `zengarden-world` crate.
//!
//! All fallible catalog and plot operations in this crate return
//! [`WorldError`].

use zengarden_types::{CellPos, SeedId};

/// Errors that can occur during catalog and plot operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A seed id is not present in the catalog.
    #[error("unknown seed: {0}")]
    UnknownSeed(SeedId),

    /// The target cell already holds a plant.
    #[error("plot {0} is already occupied")]
    CellOccupied(CellPos),

    /// The target cell holds no plant.
    #[error("nothing planted at {0}")]
    CellEmpty(CellPos),

    /// The plant in the target cell has not finished growing.
    #[error("{seed_id} at {pos} is not grown yet")]
    NotGrown {
        /// The cell.
        pos: CellPos,
        /// The growing seed.
        seed_id: SeedId,
    },

    /// A seed definition failed validation.
    #[error("invalid seed definition {seed_id}: {reason}")]
    InvalidSeedDefinition {
        /// The offending seed.
        seed_id: SeedId,
        /// What is wrong with it.
        reason: String,
    },

    /// Two definitions share the same seed id.
    #[error("duplicate seed id: {0}")]
    DuplicateSeed(SeedId),

    /// The catalog has no seeds at all.
    #[error("seed catalog is empty")]
    EmptyCatalog,
}
