//! Error types for the `zengarden-economy` crate.
//!
//! Every failure is detected before any balance, count, or stock is changed,
//! so an error always means the caller's state is untouched.

use zengarden_types::SeedId;

/// Errors that can occur during inventory, shop, and ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// A seed id has no inventory or stock entry.
    #[error("unknown seed: {0}")]
    UnknownSeed(SeedId),

    /// Quantities passed to inventory operations must be positive.
    #[error("quantity must be positive")]
    ZeroQuantity,

    /// Attempted to remove more seeds than the inventory holds.
    #[error("insufficient inventory: wanted {requested} {seed_id} but only have {available}")]
    InsufficientInventory {
        /// The seed being removed.
        seed_id: SeedId,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually held.
        available: u32,
    },

    /// The shop has no stock left for this seed.
    #[error("{0} is out of stock")]
    OutOfStock(SeedId),

    /// The player cannot afford the seed.
    #[error("insufficient funds: {seed_id} costs {price} but only {money} available")]
    InsufficientFunds {
        /// The seed being bought.
        seed_id: SeedId,
        /// Purchase price.
        price: u64,
        /// Money on hand.
        money: u64,
    },

    /// A ledger index does not refer to a harvested item.
    #[error("no harvested item at index {index} (ledger holds {len})")]
    ItemNotFound {
        /// The requested index.
        index: usize,
        /// Number of items in the ledger.
        len: usize,
    },

    /// An arithmetic overflow occurred while updating a balance or count.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
