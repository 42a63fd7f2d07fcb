//! Seed shop: per-seed stock with a shared periodic restock.
//!
//! Stock is consumed by purchases and refilled for every seed at once when
//! the restock interval has elapsed since `last_restock_time`. Like plant
//! growth, the restock check is computed from absolute timestamps, so a long
//! gap between checks triggers exactly one restock.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use zengarden_types::{EpochMillis, SeedId};
use zengarden_world::{SeedCatalog, SeedDefinition};

use crate::error::EconomyError;
use crate::inventory::Inventory;

// ---------------------------------------------------------------------------
// Stock policy
// ---------------------------------------------------------------------------

/// How restock quantities are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockPolicy {
    /// Uniform draw from the seed's `[min_stock, max_stock]`.
    #[default]
    FixedRange,
    /// Quantities scale with how many seeds a coin budget buys.
    ///
    /// The upper bound is `budget / price` and the lower bound half of that,
    /// both kept inside the seed's `[min_stock, max_stock]`.
    PriceScaled {
        /// Coins the shop spends per seed kind on each restock.
        budget: u64,
    },
}

impl StockPolicy {
    /// Inclusive quantity range for one seed.
    pub fn quantity_range(self, def: &SeedDefinition) -> (u32, u32) {
        match self {
            Self::FixedRange => (def.min_stock, def.max_stock),
            Self::PriceScaled { budget } => {
                let affordable = budget
                    .checked_div(def.price)
                    .map_or(def.max_stock, |n| u32::try_from(n).unwrap_or(u32::MAX));
                let high = affordable.max(def.min_stock).min(def.max_stock);
                let low = (high / 2).max(def.min_stock).min(high);
                (low, high)
            }
        }
    }

    /// Draw a restock quantity for one seed.
    pub fn draw(self, def: &SeedDefinition, rng: &mut impl Rng) -> u32 {
        let (low, high) = self.quantity_range(def);
        if low >= high {
            high
        } else {
            rng.random_range(low..=high)
        }
    }
}

// ---------------------------------------------------------------------------
// Restock check
// ---------------------------------------------------------------------------

/// Result of [`ShopEconomy::check_restock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestockCheck {
    /// Whether a restock happened during this check.
    pub restocked: bool,
    /// Milliseconds until the next restock, for display.
    pub remaining_ms: u64,
}

// ---------------------------------------------------------------------------
// ShopEconomy
// ---------------------------------------------------------------------------

/// Shop stock for every catalog seed and the shared restock timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopEconomy {
    /// Seed id to units available for purchase.
    stock: BTreeMap<SeedId, u32>,
    /// When the shop was last refilled (epoch ms).
    last_restock_time: EpochMillis,
}

impl ShopEconomy {
    /// Open a shop with freshly drawn stock, restocked at `now`.
    pub fn open(
        catalog: &SeedCatalog,
        policy: StockPolicy,
        now: EpochMillis,
        rng: &mut impl Rng,
    ) -> Self {
        let mut shop = Self {
            stock: BTreeMap::new(),
            last_restock_time: now,
        };
        shop.restock(catalog, policy, now, rng);
        shop
    }

    /// Rebuild a shop from stored stock.
    ///
    /// Counts are clamped to each seed's `max_stock`, unknown seeds are
    /// dropped, and catalog seeds absent from `stock` start fully stocked.
    pub fn from_parts(
        stock: &BTreeMap<SeedId, u32>,
        last_restock_time: EpochMillis,
        catalog: &SeedCatalog,
    ) -> Self {
        let stock = catalog
            .definitions()
            .iter()
            .map(|def| {
                let count = stock
                    .get(&def.id)
                    .map_or(def.max_stock, |&n| n.min(def.max_stock));
                (def.id.clone(), count)
            })
            .collect();
        Self {
            stock,
            last_restock_time,
        }
    }

    /// Units of a seed available; zero for unknown seeds.
    pub fn stock(&self, seed_id: &str) -> u32 {
        self.stock.get(seed_id).copied().unwrap_or(0)
    }

    /// All stock entries in seed-id order.
    pub const fn stock_levels(&self) -> &BTreeMap<SeedId, u32> {
        &self.stock
    }

    /// When the shop was last refilled.
    pub const fn last_restock_time(&self) -> EpochMillis {
        self.last_restock_time
    }

    /// Milliseconds until the next restock is due; zero when overdue.
    pub const fn time_until_restock(&self, now: EpochMillis, interval_ms: u64) -> u64 {
        let elapsed = now.saturating_sub(self.last_restock_time);
        interval_ms.saturating_sub(elapsed)
    }

    /// Buy one seed: stock -1, money -price, inventory +1.
    ///
    /// All three changes are applied together or not at all.
    ///
    /// # Errors
    ///
    /// [`EconomyError::OutOfStock`] when no units remain,
    /// [`EconomyError::InsufficientFunds`] when `money < price`, or an
    /// inventory error if the seed has no inventory entry.
    pub fn purchase(
        &mut self,
        def: &SeedDefinition,
        money: &mut u64,
        inventory: &mut Inventory,
    ) -> Result<(), EconomyError> {
        let available = self
            .stock
            .get(&def.id)
            .copied()
            .ok_or_else(|| EconomyError::UnknownSeed(def.id.clone()))?;
        let Some(stock_after) = available.checked_sub(1) else {
            return Err(EconomyError::OutOfStock(def.id.clone()));
        };
        let Some(money_after) = money.checked_sub(def.price) else {
            return Err(EconomyError::InsufficientFunds {
                seed_id: def.id.clone(),
                price: def.price,
                money: *money,
            });
        };
        // Validates the inventory side before anything is written.
        inventory.count_after_add(def.id.as_str(), 1)?;

        inventory.add(def.id.as_str(), 1)?;
        self.stock.insert(def.id.clone(), stock_after);
        *money = money_after;
        debug!(seed = %def.id, price = def.price, money = money_after, stock = stock_after, "Seed purchased");
        Ok(())
    }

    /// Refill every seed's stock and set `last_restock_time = now`.
    pub fn restock(
        &mut self,
        catalog: &SeedCatalog,
        policy: StockPolicy,
        now: EpochMillis,
        rng: &mut impl Rng,
    ) {
        self.stock = catalog
            .definitions()
            .iter()
            .map(|def| (def.id.clone(), policy.draw(def, rng)))
            .collect();
        self.last_restock_time = now;
        info!(now, stock = ?self.stock, "Shop restocked");
    }

    /// Restock if `interval_ms` has elapsed since the last restock.
    pub fn check_restock(
        &mut self,
        catalog: &SeedCatalog,
        policy: StockPolicy,
        interval_ms: u64,
        now: EpochMillis,
        rng: &mut impl Rng,
    ) -> RestockCheck {
        let due = now.saturating_sub(self.last_restock_time) >= interval_ms;
        if due {
            self.restock(catalog, policy, now, rng);
        }
        RestockCheck {
            restocked: due,
            remaining_ms: self.time_until_restock(now, interval_ms),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use zengarden_world::starting_catalog;

    use super::*;

    const INTERVAL: u64 = 300_000;

    fn setup() -> (SeedCatalog, ShopEconomy, SmallRng) {
        let catalog = starting_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let shop = ShopEconomy::open(&catalog, StockPolicy::FixedRange, 0, &mut rng);
        (catalog, shop, rng)
    }

    fn assert_in_range(catalog: &SeedCatalog, shop: &ShopEconomy) {
        for def in catalog.definitions() {
            let n = shop.stock(def.id.as_str());
            assert!(
                n >= def.min_stock && n <= def.max_stock,
                "{} stock {n} outside [{}, {}]",
                def.id,
                def.min_stock,
                def.max_stock
            );
        }
    }

    #[test]
    fn open_stocks_every_seed_in_range() {
        let (catalog, shop, _) = setup();
        assert_eq!(shop.stock_levels().len(), catalog.len());
        assert_in_range(&catalog, &shop);
        assert_eq!(shop.last_restock_time(), 0);
    }

    #[test]
    fn purchase_moves_stock_money_and_inventory() {
        let (catalog, mut shop, _) = setup();
        let carrot = catalog.get("carrot").unwrap();
        let mut inventory = Inventory::for_catalog(&catalog);
        let mut money = 100;
        let before = shop.stock("carrot");

        shop.purchase(carrot, &mut money, &mut inventory).unwrap();

        assert_eq!(money, 90);
        assert_eq!(inventory.count("carrot"), 1);
        assert_eq!(shop.stock("carrot"), before - 1);
    }

    #[test]
    fn purchase_without_funds_changes_nothing() {
        let (catalog, mut shop, _) = setup();
        let corn = catalog.get("corn").unwrap();
        let mut inventory = Inventory::for_catalog(&catalog);
        let mut money = 100;
        let before = shop.clone();

        let err = shop.purchase(corn, &mut money, &mut inventory).unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientFunds { price: 200, money: 100, .. }));
        assert_eq!(money, 100);
        assert_eq!(inventory.count("corn"), 0);
        assert_eq!(shop, before);
    }

    #[test]
    fn purchase_out_of_stock_changes_nothing() {
        let catalog = starting_catalog().unwrap();
        let mut stock = BTreeMap::new();
        stock.insert(SeedId::from("carrot"), 0);
        let mut shop = ShopEconomy::from_parts(&stock, 0, &catalog);
        let mut inventory = Inventory::for_catalog(&catalog);
        let mut money = 1_000;

        let err = shop
            .purchase(catalog.get("carrot").unwrap(), &mut money, &mut inventory)
            .unwrap_err();
        assert!(matches!(err, EconomyError::OutOfStock(_)));
        assert_eq!(money, 1_000);
        assert_eq!(inventory.count("carrot"), 0);
    }

    #[test]
    fn check_restock_waits_for_interval() {
        let (catalog, mut shop, mut rng) = setup();
        let carrot = catalog.get("carrot").unwrap();
        let mut inventory = Inventory::for_catalog(&catalog);
        let mut money = 1_000;
        shop.purchase(carrot, &mut money, &mut inventory).unwrap();
        let before = shop.clone();

        let check = shop.check_restock(&catalog, StockPolicy::FixedRange, INTERVAL, INTERVAL - 1, &mut rng);
        assert!(!check.restocked);
        assert_eq!(check.remaining_ms, 1);
        assert_eq!(shop, before);

        let check = shop.check_restock(&catalog, StockPolicy::FixedRange, INTERVAL, INTERVAL, &mut rng);
        assert!(check.restocked);
        assert_eq!(check.remaining_ms, INTERVAL);
        assert_eq!(shop.last_restock_time(), INTERVAL);
        assert_in_range(&catalog, &shop);
    }

    #[test]
    fn long_gap_restocks_once() {
        let (catalog, mut shop, mut rng) = setup();
        let now = INTERVAL * 10 + 5;
        assert!(shop.check_restock(&catalog, StockPolicy::FixedRange, INTERVAL, now, &mut rng).restocked);
        assert!(!shop.check_restock(&catalog, StockPolicy::FixedRange, INTERVAL, now, &mut rng).restocked);
        assert_eq!(shop.last_restock_time(), now);
    }

    #[test]
    fn from_parts_clamps_and_fills_new_seeds() {
        let catalog = starting_catalog().unwrap();
        let mut stock = BTreeMap::new();
        stock.insert(SeedId::from("carrot"), 999);
        stock.insert(SeedId::from("pumpkin"), 3);
        let shop = ShopEconomy::from_parts(&stock, 42, &catalog);
        let carrot = catalog.get("carrot").unwrap();
        let corn = catalog.get("corn").unwrap();
        assert_eq!(shop.stock("carrot"), carrot.max_stock);
        assert_eq!(shop.stock("corn"), corn.max_stock);
        assert_eq!(shop.stock("pumpkin"), 0);
        assert_eq!(shop.last_restock_time(), 42);
    }

    #[test]
    fn price_scaled_range_follows_budget() {
        let catalog = starting_catalog().unwrap();
        let carrot = catalog.get("carrot").unwrap();
        let corn = catalog.get("corn").unwrap();
        let policy = StockPolicy::PriceScaled { budget: 100 };
        // 100 / 10 = 10 carrots, within [5, 12].
        assert_eq!(policy.quantity_range(carrot), (5, 10));
        // 100 / 200 = 0 corn, raised to min_stock.
        assert_eq!(policy.quantity_range(corn), (1, 1));

        let mut rng = SmallRng::seed_from_u64(42);
        let mut shop = ShopEconomy::open(&catalog, policy, 0, &mut rng);
        shop.restock(&catalog, policy, 1, &mut rng);
        assert_in_range(&catalog, &shop);
    }

    #[test]
    fn policy_deserializes_from_tagged_form() {
        let policy: StockPolicy =
            serde_json::from_str(r#"{"kind":"price_scaled","budget":500}"#).unwrap();
        assert_eq!(policy, StockPolicy::PriceScaled { budget: 500 });
        let policy: StockPolicy = serde_json::from_str(r#"{"kind":"fixed_range"}"#).unwrap();
        assert_eq!(policy, StockPolicy::FixedRange);
    }
}
