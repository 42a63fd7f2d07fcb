//! The garden controller: the only entry point the renderer calls.
//!
//! [`Garden`] owns the catalog, the game state, the persistence adapter, the
//! RNG, and two output queues:
//!
//! - **notices** -- short player-facing messages tagged info/success/error
//! - **events** -- [`GameEvent`] values describing each state change
//!
//! Every action checks all of its preconditions before the first mutation,
//! so a rejected action leaves the state exactly as it was and only adds an
//! error notice. Every successful mutation is followed by a save. A failed
//! save is reported as a notice and kept in [`Garden::last_save_error`]; it
//! never fails or rolls back the action.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use zengarden_economy::{EconomyError, appraise};
use zengarden_types::{
    CellPos, CellState, CellView, EpochMillis, GameEvent, GameSnapshot, HarvestedItem, Notice,
    PlantInstance, SHOVEL, SeedId, ToolId,
};
use zengarden_world::{SeedCatalog, WorldError, growth_progress};

use crate::config::{ConfigError, GameConfig};
use crate::error::{ActionError, PersistenceError};
use crate::persistence::{LoadSource, PersistenceAdapter};
use crate::state::GameState;
use crate::store::StateStore;

const SAVE_FAILED: &str = "Could not save game. Storage may be unavailable or full.";

/// The game controller.
#[derive(Debug)]
pub struct Garden<S> {
    pub(crate) catalog: SeedCatalog,
    pub(crate) config: GameConfig,
    pub(crate) state: GameState,
    pub(crate) persistence: PersistenceAdapter<S>,
    pub(crate) rng: SmallRng,
    pub(crate) notices: Vec<Notice>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) last_save_error: Option<PersistenceError>,
}

impl<S: StateStore> Garden<S> {
    /// Build the catalog from `config`, then load the saved game from `store`.
    ///
    /// A missing or unreadable save starts a fresh game, which is saved
    /// right away so its shop stock and restock time survive a reopen. The
    /// outcome is reported through the notice queue.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured catalog is invalid.
    pub fn open(config: GameConfig, store: S, now: EpochMillis) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.catalog()?;
        let mut rng = config
            .garden
            .rng_seed
            .map_or_else(|| SmallRng::from_rng(&mut rand::rng()), SmallRng::seed_from_u64);

        let mut persistence = PersistenceAdapter::new(store, config.persistence.key.clone());
        let starting_money = config.garden.starting_money;
        let policy = config.shop.stock_policy;
        let outcome = persistence.load(&catalog, now, starting_money, || {
            GameState::new(&catalog, starting_money, policy, now, &mut rng)
        });

        let notice = match &outcome.source {
            LoadSource::Restored => Notice::info("Game loaded from previous session!"),
            LoadSource::Fresh => {
                Notice::info("Welcome to My Zen Garden! Buy some seeds to get started.")
            }
            LoadSource::Recovered(_) => Notice::error(
                "Could not load game. Saved data might be corrupt. Starting new game.",
            ),
        };
        info!(
            seeds = catalog.len(),
            money = outcome.state.money,
            source = ?outcome.source,
            "Garden opened"
        );
        let restored = matches!(outcome.source, LoadSource::Restored);

        let mut garden = Self {
            catalog,
            config,
            state: outcome.state,
            persistence,
            rng,
            notices: vec![notice],
            events: Vec::new(),
            last_save_error: None,
        };
        if !restored {
            garden.persist();
        }
        Ok(garden)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current game state (read-only).
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The seed catalog.
    pub const fn catalog(&self) -> &SeedCatalog {
        &self.catalog
    }

    /// The active configuration.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        self.persistence.store()
    }

    /// The most recent save failure, cleared by the next successful save.
    pub const fn last_save_error(&self) -> Option<&PersistenceError> {
        self.last_save_error.as_ref()
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        core::mem::take(&mut self.notices)
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Buy one seed from the shop.
    ///
    /// # Errors
    ///
    /// Unknown seed (not found), out of stock, or insufficient funds.
    pub fn buy(&mut self, seed_id: &str) -> Result<(), ActionError> {
        self.try_buy(seed_id).or_else(|err| self.reject(err))
    }

    fn try_buy(&mut self, seed_id: &str) -> Result<(), ActionError> {
        let def = self.catalog.get(seed_id)?;
        self.state
            .shop
            .purchase(def, &mut self.state.money, &mut self.state.inventory)?;
        let (id, price) = (def.id.clone(), def.price);
        self.notices.push(Notice::success(format!(
            "Bought {} Seed for {price} coins! It's in your inventory.",
            def.display_name
        )));
        debug!(seed = %id, price, money = self.state.money, "Seed bought");
        self.events.push(GameEvent::SeedPurchased { seed_id: id, price });
        self.persist();
        Ok(())
    }

    /// Select a seed for planting, or deselect it if already selected.
    ///
    /// Selecting a seed puts away any selected tool. Returns the new
    /// selection.
    ///
    /// # Errors
    ///
    /// Unknown seed (not found), or no seeds of that kind owned.
    pub fn select_seed(&mut self, seed_id: &str) -> Result<Option<SeedId>, ActionError> {
        self.try_select_seed(seed_id).or_else(|err| self.reject(err))
    }

    fn try_select_seed(&mut self, seed_id: &str) -> Result<Option<SeedId>, ActionError> {
        let def = self.catalog.get(seed_id)?;
        if self.state.selected_seed.as_ref() == Some(&def.id) {
            self.state.selected_seed = None;
            self.notices
                .push(Notice::info("Seed deselected. Click a seed to plant."));
            self.events.push(GameEvent::SeedSelected { seed_id: None });
            self.persist();
            return Ok(None);
        }
        if !self.state.inventory.has(def.id.as_str()) {
            return Err(ActionError::NoSeedsOwned(def.id.clone()));
        }

        let id = def.id.clone();
        self.notices.push(Notice::info(format!(
            "Selected {} seed. Click an EMPTY plot to plant it.",
            def.display_name
        )));
        self.state.selected_seed = Some(id.clone());
        if self.state.selected_tool.take().is_some() {
            self.events.push(GameEvent::ToolSelected { tool_id: None });
        }
        self.events.push(GameEvent::SeedSelected {
            seed_id: Some(id.clone()),
        });
        self.persist();
        Ok(Some(id))
    }

    /// Plant the selected seed in an empty cell.
    ///
    /// Planting the last seed of a kind clears the selection.
    ///
    /// # Errors
    ///
    /// No seed selected, no seeds of that kind left, or the cell is occupied.
    pub fn plant(&mut self, pos: CellPos, now: EpochMillis) -> Result<(), ActionError> {
        self.try_plant(pos, now).or_else(|err| self.reject(err))
    }

    fn try_plant(&mut self, pos: CellPos, now: EpochMillis) -> Result<(), ActionError> {
        let seed_id = self
            .state
            .selected_seed
            .clone()
            .ok_or(ActionError::NoSeedSelected)?;
        let def = self.catalog.get(seed_id.as_str())?;
        let remaining = self.state.inventory.count_after_remove(seed_id.as_str(), 1)?;
        self.state.plot.ensure_empty(pos)?;

        self.state.plot.plant(pos, def, now)?;
        self.state.inventory.remove(seed_id.as_str(), 1)?;
        self.events.push(GameEvent::Planted {
            pos,
            seed_id: seed_id.clone(),
        });

        let name = &def.display_name;
        if remaining == 0 {
            self.state.selected_seed = None;
            self.events.push(GameEvent::SeedSelected { seed_id: None });
            self.notices.push(Notice::info(format!(
                "Planted {name} at {pos}! You've run out of {name} seeds, so it has been deselected."
            )));
        } else {
            self.notices.push(Notice::success(format!(
                "Planted {name} at {pos}! Click another empty plot to plant more."
            )));
        }
        debug!(%pos, seed = %seed_id, remaining, "Seed planted");
        self.persist();
        Ok(())
    }

    /// Harvest a ready plant into the harvest ledger.
    ///
    /// Multi-harvest plants with credits left regrow from `now`; everything
    /// else leaves the cell empty.
    ///
    /// # Errors
    ///
    /// The cell is empty or the plant is still growing.
    pub fn harvest(&mut self, pos: CellPos, now: EpochMillis) -> Result<HarvestedItem, ActionError> {
        self.try_harvest(pos, now).or_else(|err| self.reject(err))
    }

    fn try_harvest(&mut self, pos: CellPos, now: EpochMillis) -> Result<HarvestedItem, ActionError> {
        let (item, cleared, multi) = self.harvest_cell(pos, now)?;
        let name = self.display_name(&item.seed_id).to_owned();
        self.notices.push(Notice::success(format!(
            "Harvested a {name} (Weight: {:.2}kg, Est. Value: {} coins)! It's in your Harvested Crops inventory.",
            item.weight, item.sell_value
        )));
        if cleared && multi {
            self.notices.push(Notice::success(format!(
                "Fully harvested {name}. Plot is now empty."
            )));
        }
        self.persist();
        Ok(item)
    }

    /// Harvest every ready cell in row-major order.
    ///
    /// With nothing ready this is an informational no-op, not an error.
    ///
    /// # Errors
    ///
    /// A ready plant references a seed missing from the catalog; nothing is
    /// harvested in that case.
    pub fn collect_all(&mut self, now: EpochMillis) -> Result<Vec<HarvestedItem>, ActionError> {
        self.try_collect_all(now).or_else(|err| self.reject(err))
    }

    fn try_collect_all(&mut self, now: EpochMillis) -> Result<Vec<HarvestedItem>, ActionError> {
        let ready = self.state.plot.ready_cells();
        if ready.is_empty() {
            self.notices.push(Notice::info("No grown plants to harvest!"));
            return Ok(Vec::new());
        }
        for &pos in &ready {
            let plant = self.state.plot.ready_plant(pos)?;
            self.catalog.get(plant.seed_id.as_str())?;
        }

        let mut items = Vec::with_capacity(ready.len());
        for pos in ready {
            let (item, cleared, multi) = self.harvest_cell(pos, now)?;
            if cleared && multi {
                let message = format!(
                    "Fully harvested {}. Plot is now empty.",
                    self.display_name(&item.seed_id)
                );
                self.notices.push(Notice::success(message));
            }
            items.push(item);
        }
        self.notices.push(Notice::success(format!(
            "Harvested {} grown plants! They're in your Harvested Crops inventory.",
            items.len()
        )));
        self.persist();
        Ok(items)
    }

    /// Sell one harvested item by ledger index.
    ///
    /// # Errors
    ///
    /// The index does not refer to an item (not found).
    pub fn sell(&mut self, index: usize) -> Result<HarvestedItem, ActionError> {
        self.try_sell(index).or_else(|err| self.reject(err))
    }

    fn try_sell(&mut self, index: usize) -> Result<HarvestedItem, ActionError> {
        let value = self
            .state
            .ledger
            .items()
            .get(index)
            .map(|item| item.sell_value)
            .ok_or(EconomyError::ItemNotFound {
                index,
                len: self.state.ledger.len(),
            })?;
        let money = credit(self.state.money, value)?;
        let item = self.state.ledger.sell(index)?;
        self.state.money = money;

        let message = format!(
            "Sold {} (Weight: {}kg) for {} coins!",
            self.display_name(&item.seed_id),
            item.weight,
            item.sell_value
        );
        self.notices.push(Notice::success(message));
        self.events.push(GameEvent::Sold {
            count: 1,
            total: item.sell_value,
        });
        debug!(index, value, money, "Item sold");
        self.persist();
        Ok(item)
    }

    /// Sell every harvested item. Returns the coins earned.
    ///
    /// An empty ledger earns zero and is not an error.
    ///
    /// # Errors
    ///
    /// The credited balance would overflow.
    pub fn sell_all(&mut self) -> Result<u64, ActionError> {
        self.try_sell_all().or_else(|err| self.reject(err))
    }

    fn try_sell_all(&mut self) -> Result<u64, ActionError> {
        if self.state.ledger.is_empty() {
            self.notices.push(Notice::info("No harvested crops to sell!"));
            return Ok(0);
        }
        let total = self.state.ledger.total_value();
        let money = credit(self.state.money, total)?;
        let sold = self.state.ledger.sell_all();
        self.state.money = money;

        let count = u32::try_from(sold.len()).unwrap_or(u32::MAX);
        self.notices.push(Notice::success(format!(
            "Sold {count} harvested crops for a total of {total} coins!"
        )));
        self.events.push(GameEvent::Sold { count, total });
        debug!(count, total, money, "Ledger sold");
        self.persist();
        Ok(total)
    }

    /// Select an owned tool, or put it away if already selected.
    ///
    /// Selecting a tool clears the seed selection. Returns the new selection.
    ///
    /// # Errors
    ///
    /// The tool is not owned (not found).
    pub fn select_tool(&mut self, tool_id: &str) -> Result<Option<ToolId>, ActionError> {
        self.try_select_tool(tool_id).or_else(|err| self.reject(err))
    }

    fn try_select_tool(&mut self, tool_id: &str) -> Result<Option<ToolId>, ActionError> {
        let Some(tool) = self.state.tools.get(tool_id).cloned() else {
            return Err(ActionError::UnknownTool(ToolId::from(tool_id)));
        };
        if self.state.selected_tool.as_ref() == Some(&tool) {
            self.state.selected_tool = None;
            self.notices.push(Notice::info(format!("Put away the {tool}.")));
            self.events.push(GameEvent::ToolSelected { tool_id: None });
            self.persist();
            return Ok(None);
        }

        self.state.selected_tool = Some(tool.clone());
        if self.state.selected_seed.take().is_some() {
            self.events.push(GameEvent::SeedSelected { seed_id: None });
        }
        self.notices.push(Notice::info(format!(
            "Selected the {tool}. Click a plot to use it."
        )));
        self.events.push(GameEvent::ToolSelected {
            tool_id: Some(tool.clone()),
        });
        self.persist();
        Ok(Some(tool))
    }

    /// Apply the selected tool to a cell.
    ///
    /// The shovel digs up any plant, growing or ready, without refunding the
    /// seed, and is put away afterwards. Returns the removed plant.
    ///
    /// # Errors
    ///
    /// No tool selected, or nothing planted in the cell.
    pub fn use_tool(&mut self, pos: CellPos) -> Result<PlantInstance, ActionError> {
        self.try_use_tool(pos).or_else(|err| self.reject(err))
    }

    fn try_use_tool(&mut self, pos: CellPos) -> Result<PlantInstance, ActionError> {
        let tool = self
            .state
            .selected_tool
            .clone()
            .ok_or(ActionError::NoToolSelected)?;
        if tool.as_str() != SHOVEL {
            return Err(ActionError::UnknownTool(tool));
        }

        let plant = self.state.plot.dig_up(pos)?;
        self.state.selected_tool = None;
        let message = format!("Dug up the {} at {pos}.", self.display_name(&plant.seed_id));
        self.notices.push(Notice::success(message));
        self.events.push(GameEvent::DugUp {
            pos,
            seed_id: plant.seed_id.clone(),
        });
        self.events.push(GameEvent::ToolSelected { tool_id: None });
        debug!(%pos, seed = %plant.seed_id, "Plant dug up");
        self.persist();
        Ok(plant)
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Read-only view of the game at `now` for rendering.
    pub fn snapshot(&self, now: EpochMillis) -> GameSnapshot {
        let cells = self
            .state
            .plot
            .iter()
            .map(|(pos, plant)| self.cell_view(pos, plant, now))
            .collect();
        GameSnapshot {
            money: self.state.money,
            cells,
            inventory: self.state.inventory.counts().clone(),
            harvested: self.state.ledger.items().to_vec(),
            shop_stock: self.state.shop.stock_levels().clone(),
            next_restock_in_ms: self
                .state
                .shop
                .time_until_restock(now, self.config.garden.restock_interval_ms),
            selected_seed_id: self.state.selected_seed.clone(),
            selected_tool: self.state.selected_tool.clone(),
            tools: self.state.tools.iter().cloned().collect(),
        }
    }

    fn cell_view(&self, pos: CellPos, plant: Option<&PlantInstance>, now: EpochMillis) -> CellView {
        let Some(plant) = plant else {
            return CellView {
                pos,
                state: CellState::Empty,
                seed_id: None,
                progress: 0.0,
                stage: None,
                harvests_remaining: None,
            };
        };
        let def = self.catalog.find(plant.seed_id.as_str());
        let progress = def.map_or_else(
            || if plant.is_grown { 1.0 } else { 0.0 },
            |def| growth_progress(plant, def, now),
        );
        CellView {
            pos,
            state: plant.state(),
            seed_id: Some(plant.seed_id.clone()),
            progress,
            stage: def
                .and_then(|def| def.stage_for(progress))
                .map(str::to_owned),
            harvests_remaining: Some(plant.harvests_remaining),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Harvest one ready cell: appraise, update the plot, record the item.
    ///
    /// Returns the item, whether the cell was cleared, and whether the plant
    /// was multi-harvest.
    fn harvest_cell(
        &mut self,
        pos: CellPos,
        now: EpochMillis,
    ) -> Result<(HarvestedItem, bool, bool), ActionError> {
        let seed_id = self.state.plot.ready_plant(pos)?.seed_id.clone();
        let def = self.catalog.get(seed_id.as_str())?;
        let item = appraise(def, now, &mut self.rng);
        let outcome = self.state.plot.harvest(pos, now)?;
        self.state.ledger.add(item.clone());
        self.events.push(GameEvent::Harvested {
            pos,
            item: item.clone(),
            cleared: outcome.cleared,
        });
        debug!(%pos, seed = %seed_id, weight = item.weight, value = item.sell_value, cleared = outcome.cleared, "Plant harvested");
        Ok((item, outcome.cleared, outcome.plant.is_multi_harvest))
    }

    /// Write the current state, reporting but never propagating failure.
    pub(crate) fn persist(&mut self) {
        match self.persistence.save(&self.state) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "Could not save game");
                self.notices.push(Notice::error(SAVE_FAILED));
                self.last_save_error = Some(err);
            }
        }
    }

    /// Record a rejected action and hand the error back.
    fn reject<T>(&mut self, err: ActionError) -> Result<T, ActionError> {
        debug!(error = %err, kind = ?err.kind(), "Action rejected");
        let message = self.describe(&err);
        self.notices.push(Notice::error(message));
        Err(err)
    }

    pub(crate) fn display_name<'a>(&'a self, seed_id: &'a SeedId) -> &'a str {
        self.catalog
            .find(seed_id.as_str())
            .map_or(seed_id.as_str(), |def| def.display_name.as_str())
    }

    /// Player-facing text for a rejected action.
    fn describe(&self, err: &ActionError) -> String {
        match err {
            ActionError::NoSeedSelected => {
                String::from("No seed selected! Select one from your inventory first.")
            }
            ActionError::NoToolSelected => {
                String::from("No tool selected! Pick one from your tools first.")
            }
            ActionError::UnknownTool(id) => format!("You don't have a tool called {id}."),
            ActionError::NoSeedsOwned(id) => {
                format!("You don't have any {} seeds!", self.display_name(id))
            }
            ActionError::World(WorldError::UnknownSeed(id))
            | ActionError::Economy(EconomyError::UnknownSeed(id)) => {
                format!("There is no seed called {id}.")
            }
            ActionError::World(WorldError::CellOccupied(_)) => {
                String::from("That spot is already occupied! Choose an empty plot.")
            }
            ActionError::World(WorldError::CellEmpty(_)) => {
                String::from("There's no plant in that spot.")
            }
            ActionError::World(WorldError::NotGrown { seed_id, .. }) => format!(
                "{} is not yet grown! Come back later.",
                self.display_name(seed_id)
            ),
            ActionError::Economy(EconomyError::OutOfStock(id)) => format!(
                "{} seeds are out of stock! Wait for the next restock.",
                self.display_name(id)
            ),
            ActionError::Economy(EconomyError::InsufficientFunds { .. }) => {
                String::from("Not enough money to buy that seed!")
            }
            ActionError::Economy(EconomyError::InsufficientInventory { seed_id, .. }) => format!(
                "You don't have any {} seeds left!",
                self.display_name(seed_id)
            ),
            ActionError::Economy(EconomyError::ItemNotFound { .. }) => {
                String::from("Item not found in your harvested crops.")
            }
            ActionError::World(other) => other.to_string(),
            ActionError::Economy(other) => other.to_string(),
        }
    }
}

fn credit(money: u64, amount: u64) -> Result<u64, EconomyError> {
    money
        .checked_add(amount)
        .ok_or_else(|| EconomyError::ArithmeticOverflow {
            context: String::from("money after sale"),
        })
}
