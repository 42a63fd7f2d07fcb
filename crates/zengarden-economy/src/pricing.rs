//! Crop weights and sell values.
//!
//! A harvest samples a weight uniformly from the seed's weight range, rounds
//! it to two decimals, and prices it from that stored weight. Both sell-value
//! policies are floored at the seed's purchase price, so a harvest never
//! sells for less than the seed cost.
//!
//! - [`SellValue::Multiplier`]: `round(max(base_sell_price * weight, price))`.
//! - [`SellValue::Range`]: linear from `min_sell_price` at `min_weight` to
//!   `max_sell_price` at `max_weight`, then floored at the price.

use rand::Rng;

use zengarden_types::{EpochMillis, HarvestedItem};
use zengarden_world::{SeedDefinition, SellValue};

/// Sell value of a crop of `weight`, in coins.
pub fn sell_value(def: &SeedDefinition, weight: f64) -> u64 {
    let price = coins_as_f64(def.price);
    let raw = match def.sell_value {
        SellValue::Multiplier { base_sell_price } => base_sell_price * weight,
        SellValue::Range {
            min_sell_price,
            max_sell_price,
        } => {
            let span = def.max_weight - def.min_weight;
            let position = if span > 0.0 {
                ((weight - def.min_weight) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let low = coins_as_f64(min_sell_price);
            let high = coins_as_f64(max_sell_price);
            (high - low).mul_add(position, low)
        }
    };
    to_coins(raw.max(price).round())
}

/// Sample a crop weight, rounded to two decimals and kept within range.
pub fn roll_weight(def: &SeedDefinition, rng: &mut impl Rng) -> f64 {
    let sampled = if def.max_weight > def.min_weight {
        rng.random_range(def.min_weight..=def.max_weight)
    } else {
        def.min_weight
    };
    let rounded = (sampled * 100.0).round() / 100.0;
    rounded.max(def.min_weight).min(def.max_weight)
}

/// Produce the ledger entry for one harvest of `def` at `now`.
pub fn appraise(def: &SeedDefinition, now: EpochMillis, rng: &mut impl Rng) -> HarvestedItem {
    let weight = roll_weight(def, rng);
    HarvestedItem {
        seed_id: def.id.clone(),
        weight,
        sell_value: sell_value(def, weight),
        harvested_at: now,
    }
}

#[allow(clippy::cast_precision_loss)]
const fn coins_as_f64(coins: u64) -> f64 {
    // Prices are far below 2^52, so the conversion is exact.
    coins as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_coins(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        // Saturating float-to-int conversion; value is already rounded.
        value as u64
    } else {
        0
    }
}
