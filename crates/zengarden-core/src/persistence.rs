//! Save and load of the aggregate game state under one fixed key.
//!
//! Saving is best-effort: failures are returned to the controller, which
//! reports them without rolling back the in-memory change. Loading never
//! fails. A missing key starts a fresh game, and an unreadable blob is
//! removed from the store before a fresh game starts, so the same corrupt
//! save is not retried on every launch.

use tracing::{debug, info, warn};

use zengarden_types::EpochMillis;
use zengarden_world::SeedCatalog;

use crate::error::PersistenceError;
use crate::save::{Fallbacks, SaveFile};
use crate::state::GameState;
use crate::store::StateStore;

/// How [`PersistenceAdapter::load`] obtained its state.
#[derive(Debug)]
pub enum LoadSource {
    /// A previous session was restored.
    Restored,
    /// No save existed; the state is a fresh game.
    Fresh,
    /// The save could not be used; the state is a fresh game.
    Recovered(PersistenceError),
}

/// Result of [`PersistenceAdapter::load`].
#[derive(Debug)]
pub struct LoadOutcome {
    /// The state to run with.
    pub state: GameState,
    /// Where it came from.
    pub source: LoadSource,
}

/// Reads and writes the save blob through a [`StateStore`].
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    store: S,
    key: String,
}

impl<S: StateStore> PersistenceAdapter<S> {
    /// An adapter saving under `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Serialize the durable subset of `state` and write it.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if encoding or the store write fails.
    pub fn save(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(&SaveFile::capture(state))
            .map_err(|source| PersistenceError::Serialize { source })?;
        self.store.write(&self.key, &blob)?;
        debug!(key = %self.key, bytes = blob.len(), "Game saved");
        Ok(())
    }

    /// Load and reconcile the saved game, or fall back to `fresh`.
    ///
    /// `fresh` is only called when no usable save exists.
    pub fn load(
        &mut self,
        catalog: &SeedCatalog,
        now: EpochMillis,
        starting_money: u64,
        fresh: impl FnOnce() -> GameState,
    ) -> LoadOutcome {
        let blob = match self.store.read(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                info!(key = %self.key, "No saved game found, starting fresh");
                return LoadOutcome {
                    state: fresh(),
                    source: LoadSource::Fresh,
                };
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Could not read saved game, starting fresh");
                return LoadOutcome {
                    state: fresh(),
                    source: LoadSource::Recovered(err),
                };
            }
        };

        match serde_json::from_str::<SaveFile>(&blob) {
            Ok(save) => {
                let fallbacks = Fallbacks {
                    money: starting_money,
                    last_restock_time: now,
                };
                let state = save.reconcile(catalog, fallbacks);
                info!(key = %self.key, money = state.money, "Game loaded from previous session");
                LoadOutcome {
                    state,
                    source: LoadSource::Restored,
                }
            }
            Err(source) => {
                let err = PersistenceError::Parse { source };
                warn!(key = %self.key, error = %err, "Saved game is corrupt, discarding it");
                if let Err(remove_err) = self.store.remove(&self.key) {
                    warn!(key = %self.key, error = %remove_err, "Could not remove corrupt save");
                }
                LoadOutcome {
                    state: fresh(),
                    source: LoadSource::Recovered(err),
                }
            }
        }
    }
}
