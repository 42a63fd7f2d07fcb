//! Game controller, growth clock, configuration, and persistence for the Zen
//! Garden simulation.
//!
//! The renderer talks to exactly one type, [`Garden`], which validates every
//! player action, mutates the aggregate [`GameState`], saves after each
//! successful change, and queues notices and events for display.
//!
//! # Modules
//!
//! - [`clock`] -- The growth clock tick: plants ripen, the shop restocks.
//! - [`config`] -- Configuration loading from `zengarden.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- Action and persistence errors with their [`ErrorKind`].
//! - [`garden`] -- The [`Garden`] controller and its player actions.
//! - [`persistence`] -- Save and load of the game under one storage key.
//! - [`save`] -- The on-disk save shape and reconciliation of old saves.
//! - [`state`] -- The aggregate [`GameState`].
//! - [`store`] -- [`StateStore`] trait with file and in-memory backends.

pub mod clock;
pub mod config;
pub mod error;
pub mod garden;
pub mod persistence;
pub mod save;
pub mod state;
pub mod store;

// Re-export primary types at crate root.
pub use clock::TickSummary;
pub use config::{ConfigError, GameConfig};
pub use error::{ActionError, ErrorKind, PersistenceError};
pub use garden::Garden;
pub use persistence::{LoadOutcome, LoadSource, PersistenceAdapter};
pub use save::SaveFile;
pub use state::GameState;
pub use store::{FileStore, MemoryStore, StateStore};
