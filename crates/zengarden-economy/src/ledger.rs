//! Harvest ledger: harvested crops waiting to be sold.
//!
//! Items keep their insertion order. The only way out of the ledger is a
//! sale, either of one item by index or of everything at once.

use tracing::debug;

use zengarden_types::HarvestedItem;

use crate::error::EconomyError;

/// Insertion-ordered list of unsold harvests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestLedger {
    items: Vec<HarvestedItem>,
}

impl HarvestLedger {
    /// An empty ledger.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a ledger from stored items, keeping their order.
    pub const fn from_items(items: Vec<HarvestedItem>) -> Self {
        Self { items }
    }

    /// Append a harvested item.
    pub fn add(&mut self, item: HarvestedItem) {
        debug!(seed = %item.seed_id, weight = item.weight, value = item.sell_value, "Harvest recorded");
        self.items.push(item);
    }

    /// Items in harvest order.
    pub fn items(&self) -> &[HarvestedItem] {
        &self.items
    }

    /// Number of unsold items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is waiting to be sold.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Combined value of every unsold item.
    pub fn total_value(&self) -> u64 {
        total_value(&self.items)
    }

    /// Sell the item at `index`, removing and returning it.
    ///
    /// The caller credits `sell_value` to the player's money.
    ///
    /// # Errors
    ///
    /// [`EconomyError::ItemNotFound`] if `index` is out of bounds.
    pub fn sell(&mut self, index: usize) -> Result<HarvestedItem, EconomyError> {
        if index >= self.items.len() {
            return Err(EconomyError::ItemNotFound {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Sell everything, returning the removed items.
    ///
    /// An empty ledger yields an empty list, not an error.
    pub fn sell_all(&mut self) -> Vec<HarvestedItem> {
        core::mem::take(&mut self.items)
    }
}

/// Sum of sell values, saturating at `u64::MAX`.
pub fn total_value(items: &[HarvestedItem]) -> u64 {
    items
        .iter()
        .fold(0_u64, |sum, item| sum.saturating_add(item.sell_value))
}
