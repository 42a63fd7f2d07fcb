//! Seed inventory: owned seed counts available for planting.
//!
//! Every seed in the catalog always has an entry, defaulting to zero, so a
//! missing key means the seed does not exist rather than "none owned".
//! All arithmetic is checked.

use std::collections::BTreeMap;

use zengarden_types::SeedId;
use zengarden_world::SeedCatalog;

use crate::error::EconomyError;

/// Seed id to owned count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<SeedId, u32>,
}

impl Inventory {
    /// A zeroed inventory with one entry per catalog seed.
    pub fn for_catalog(catalog: &SeedCatalog) -> Self {
        Self {
            counts: catalog.ids().map(|id| (id.clone(), 0)).collect(),
        }
    }

    /// Rebuild an inventory from stored counts.
    ///
    /// Seeds missing from the catalog are dropped and catalog seeds missing
    /// from `counts` start at zero.
    pub fn from_counts(counts: &BTreeMap<SeedId, u32>, catalog: &SeedCatalog) -> Self {
        Self {
            counts: catalog
                .ids()
                .map(|id| (id.clone(), counts.get(id).copied().unwrap_or(0)))
                .collect(),
        }
    }

    /// Owned count of a seed; zero for unknown seeds.
    pub fn count(&self, seed_id: &str) -> u32 {
        self.counts.get(seed_id).copied().unwrap_or(0)
    }

    /// Whether at least one seed of this kind is owned.
    pub fn has(&self, seed_id: &str) -> bool {
        self.count(seed_id) > 0
    }

    /// All entries in seed-id order.
    pub const fn counts(&self) -> &BTreeMap<SeedId, u32> {
        &self.counts
    }

    /// Add `amount` seeds.
    ///
    /// # Errors
    ///
    /// Fails on a zero amount, an unknown seed, or `u32` overflow.
    pub fn add(&mut self, seed_id: &str, amount: u32) -> Result<u32, EconomyError> {
        let next = self.count_after_add(seed_id, amount)?;
        if let Some(entry) = self.counts.get_mut(seed_id) {
            *entry = next;
        }
        Ok(next)
    }

    /// Remove `amount` seeds.
    ///
    /// # Errors
    ///
    /// Fails on a zero amount, an unknown seed, or when fewer than `amount`
    /// seeds are owned.
    pub fn remove(&mut self, seed_id: &str, amount: u32) -> Result<u32, EconomyError> {
        let next = self.count_after_remove(seed_id, amount)?;
        if let Some(entry) = self.counts.get_mut(seed_id) {
            *entry = next;
        }
        Ok(next)
    }

    /// The count `add` would produce, without changing anything.
    ///
    /// # Errors
    ///
    /// Same as [`Inventory::add`].
    pub fn count_after_add(&self, seed_id: &str, amount: u32) -> Result<u32, EconomyError> {
        if amount == 0 {
            return Err(EconomyError::ZeroQuantity);
        }
        let current = self.entry(seed_id)?;
        current
            .checked_add(amount)
            .ok_or_else(|| EconomyError::ArithmeticOverflow {
                context: format!("inventory count for {seed_id}"),
            })
    }

    /// The count `remove` would produce, without changing anything.
    ///
    /// # Errors
    ///
    /// Same as [`Inventory::remove`].
    pub fn count_after_remove(&self, seed_id: &str, amount: u32) -> Result<u32, EconomyError> {
        if amount == 0 {
            return Err(EconomyError::ZeroQuantity);
        }
        let available = self.entry(seed_id)?;
        available
            .checked_sub(amount)
            .ok_or_else(|| EconomyError::InsufficientInventory {
                seed_id: SeedId::from(seed_id),
                requested: amount,
                available,
            })
    }

    fn entry(&self, seed_id: &str) -> Result<u32, EconomyError> {
        self.counts
            .get(seed_id)
            .copied()
            .ok_or_else(|| EconomyError::UnknownSeed(SeedId::from(seed_id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zengarden_world::starting_catalog;

    use super::*;

    fn inventory() -> Inventory {
        Inventory::for_catalog(&starting_catalog().unwrap())
    }

    #[test]
    fn every_catalog_seed_starts_at_zero() {
        let inv = inventory();
        assert_eq!(inv.counts().len(), 3);
        assert!(inv.counts().values().all(|&n| n == 0));
    }

    #[test]
    fn add_then_remove() {
        let mut inv = inventory();
        assert_eq!(inv.add("carrot", 3).unwrap(), 3);
        assert_eq!(inv.remove("carrot", 2).unwrap(), 1);
        assert_eq!(inv.count("carrot"), 1);
        assert!(inv.has("carrot"));
    }

    #[test]
    fn remove_more_than_owned_fails_without_change() {
        let mut inv = inventory();
        inv.add("corn", 1).unwrap();
        let err = inv.remove("corn", 2).unwrap_err();
        assert!(matches!(
            err,
            EconomyError::InsufficientInventory {
                requested: 2,
                available: 1,
                ..
            }
        ));
        assert_eq!(inv.count("corn"), 1);
    }

    #[test]
    fn zero_and_unknown_are_rejected() {
        let mut inv = inventory();
        assert!(matches!(inv.add("carrot", 0), Err(EconomyError::ZeroQuantity)));
        assert!(matches!(
            inv.add("pumpkin", 1),
            Err(EconomyError::UnknownSeed(_))
        ));
        assert_eq!(inv.count("pumpkin"), 0);
    }

    #[test]
    fn add_overflow_is_an_error() {
        let mut inv = inventory();
        inv.add("carrot", u32::MAX).unwrap();
        assert!(matches!(
            inv.add("carrot", 1),
            Err(EconomyError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn from_counts_reconciles_against_catalog() {
        let catalog = starting_catalog().unwrap();
        let mut stored = BTreeMap::new();
        stored.insert(SeedId::from("carrot"), 4);
        stored.insert(SeedId::from("pumpkin"), 9);
        let inv = Inventory::from_counts(&stored, &catalog);
        assert_eq!(inv.count("carrot"), 4);
        assert_eq!(inv.count("tomato"), 0);
        assert!(!inv.counts().contains_key("pumpkin"));
        assert_eq!(inv.counts().len(), 3);
    }
}
