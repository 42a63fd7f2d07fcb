//! Error types for the `zengarden-core` crate.
//!
//! Every failure is classified into one of three [`ErrorKind`]s. Validation
//! and not-found errors are local to one action and leave the game state
//! untouched. Persistence errors are caught at the save/load boundary and
//! never fail the action that triggered them.

use zengarden_economy::EconomyError;
use zengarden_types::{SeedId, ToolId};
use zengarden_world::WorldError;

/// Broad failure category, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The action is not allowed in the current state.
    Validation,
    /// The action referred to something that does not exist.
    NotFound,
    /// Reading or writing the save failed.
    Persistence,
}

/// Errors returned by player actions on the garden controller.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The action needs a selected seed and none is selected.
    #[error("no seed selected")]
    NoSeedSelected,

    /// The action needs a selected tool and none is selected.
    #[error("no tool selected")]
    NoToolSelected,

    /// The tool id is not owned by the player.
    #[error("unknown tool: {0}")]
    UnknownTool(ToolId),

    /// Selecting a seed requires owning at least one.
    #[error("no {0} seeds in inventory")]
    NoSeedsOwned(SeedId),

    /// Catalog or plot failure.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Inventory, shop, or ledger failure.
    #[error(transparent)]
    Economy(#[from] EconomyError),
}

impl ActionError {
    /// Classify this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_)
            | Self::World(WorldError::UnknownSeed(_))
            | Self::Economy(EconomyError::UnknownSeed(_) | EconomyError::ItemNotFound { .. }) => {
                ErrorKind::NotFound
            }
            Self::NoSeedSelected
            | Self::NoToolSelected
            | Self::NoSeedsOwned(_)
            | Self::World(_)
            | Self::Economy(_) => ErrorKind::Validation,
        }
    }
}

/// Errors raised while saving or loading the game.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The game state could not be encoded.
    #[error("failed to serialize save: {source}")]
    Serialize {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The stored blob is not a readable save.
    #[error("failed to parse save: {source}")]
    Parse {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The backing store failed.
    #[error("storage failure for key {key}: {source}")]
    Io {
        /// The storage key being accessed.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The backing store refused the operation.
    #[error("storage unavailable: {reason}")]
    Unavailable {
        /// Why the store refused.
        reason: String,
    },
}

impl PersistenceError {
    /// Classify this error; always [`ErrorKind::Persistence`].
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Serialize { .. }
            | Self::Parse { .. }
            | Self::Io { .. }
            | Self::Unavailable { .. } => ErrorKind::Persistence,
        }
    }
}
