//! The aggregate game state.
//!
//! [`GameState`] is one explicit value owned by the controller. Sub-states
//! are public so tests can build synthetic games, but the renderer only ever
//! sees snapshots.

use std::collections::BTreeSet;

use rand::Rng;

use zengarden_economy::{HarvestLedger, Inventory, ShopEconomy, StockPolicy};
use zengarden_types::{EpochMillis, SHOVEL, SeedId, ToolId};
use zengarden_world::{PlotGrid, SeedCatalog};

/// Tools every player owns.
pub fn default_tools() -> BTreeSet<ToolId> {
    BTreeSet::from([ToolId::from(SHOVEL)])
}

/// Everything that makes up one game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Coins on hand.
    pub money: u64,
    /// The 3x3 garden.
    pub plot: PlotGrid,
    /// Owned seeds.
    pub inventory: Inventory,
    /// Harvested, unsold crops.
    pub ledger: HarvestLedger,
    /// Shop stock and restock clock.
    pub shop: ShopEconomy,
    /// Seed that `plant` will use.
    pub selected_seed: Option<SeedId>,
    /// Tool that `use_tool` will use.
    pub selected_tool: Option<ToolId>,
    /// Owned tools; always includes the shovel.
    pub tools: BTreeSet<ToolId>,
}

impl GameState {
    /// A brand-new game: empty plot and inventory, freshly stocked shop.
    pub fn new(
        catalog: &SeedCatalog,
        starting_money: u64,
        policy: StockPolicy,
        now: EpochMillis,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            money: starting_money,
            plot: PlotGrid::new(),
            inventory: Inventory::for_catalog(catalog),
            ledger: HarvestLedger::new(),
            shop: ShopEconomy::open(catalog, policy, now, rng),
            selected_seed: None,
            selected_tool: None,
            tools: default_tools(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use zengarden_world::starting_catalog;

    use super::*;

    #[test]
    fn new_game_has_entries_for_every_seed() {
        let catalog = starting_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let state = GameState::new(&catalog, 100, StockPolicy::FixedRange, 5, &mut rng);
        assert_eq!(state.money, 100);
        assert_eq!(state.plot.occupied_count(), 0);
        for id in catalog.ids() {
            assert_eq!(state.inventory.counts().get(id), Some(&0));
            assert!(state.shop.stock_levels().contains_key(id));
        }
        assert_eq!(state.shop.last_restock_time(), 5);
        assert!(state.tools.contains(SHOVEL));
    }
}
