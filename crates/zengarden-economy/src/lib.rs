//! Money, seeds, and crops for the Zen Garden simulation.
//!
//! Everything here operates on values owned by the caller. Failures are
//! detected before any mutation, so a returned error means nothing changed.
//!
//! # Modules
//!
//! - [`error`] -- Error types for inventory, shop, and ledger operations.
//! - [`inventory`] -- [`Inventory`] seed counts with checked arithmetic.
//! - [`ledger`] -- [`HarvestLedger`] of unsold harvests, sold by index or
//!   all at once.
//! - [`pricing`] -- Weight sampling and floor-at-cost sell values.
//! - [`shop`] -- [`ShopEconomy`] stock, purchases, and the periodic
//!   restock driven by a [`StockPolicy`].

pub mod error;
pub mod inventory;
pub mod ledger;
pub mod pricing;
pub mod shop;

// Re-export primary types at crate root.
pub use error::EconomyError;
pub use inventory::Inventory;
pub use ledger::{HarvestLedger, total_value};
pub use pricing::{appraise, roll_weight, sell_value};
pub use shop::{RestockCheck, ShopEconomy, StockPolicy};
