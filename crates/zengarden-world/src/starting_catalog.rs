//! Default three-seed catalog: carrot, tomato, and corn.
//!
//! Used when the configuration file does not list its own seeds.

use zengarden_types::{Harvests, SeedId};

use crate::catalog::{GrowthStage, SeedCatalog, SeedDefinition, SellValue};
use crate::error::WorldError;

const SECOND_MS: u64 = 1_000;
const MINUTE_MS: u64 = 60 * SECOND_MS;

fn stages(ripe: &str, thresholds: [f64; 3]) -> Vec<GrowthStage> {
    let [sprout, growing, ripe_at] = thresholds;
    vec![
        GrowthStage {
            threshold: 0.0,
            key: "seedling".to_owned(),
        },
        GrowthStage {
            threshold: sprout,
            key: "sprout".to_owned(),
        },
        GrowthStage {
            threshold: growing,
            key: ripe.to_owned(),
        },
        GrowthStage {
            threshold: ripe_at,
            key: format!("{ripe}_ripe"),
        },
    ]
}

/// The built-in seed definitions in shop order.
pub fn default_seed_definitions() -> Vec<SeedDefinition> {
    vec![
        SeedDefinition {
            id: SeedId::from("carrot"),
            display_name: "Carrot".to_owned(),
            price: 10,
            grow_duration_ms: 15 * SECOND_MS,
            initial_grow_duration_ms: None,
            min_weight: 0.1,
            max_weight: 0.4,
            sell_value: SellValue::Multiplier {
                base_sell_price: 150.0,
            },
            is_multi_harvest: false,
            harvest_count: Harvests::ONCE,
            min_stock: 5,
            max_stock: 12,
            stages: stages("carrot", [0.3, 0.7, 1.0]),
        },
        // Tomatoes take a while to establish, then fruit repeatedly.
        SeedDefinition {
            id: SeedId::from("tomato"),
            display_name: "Tomato".to_owned(),
            price: 150,
            grow_duration_ms: 45 * SECOND_MS,
            initial_grow_duration_ms: Some(90 * SECOND_MS),
            min_weight: 0.1,
            max_weight: 0.3,
            sell_value: SellValue::Multiplier {
                base_sell_price: 1500.0,
            },
            is_multi_harvest: true,
            harvest_count: Harvests::Infinite,
            min_stock: 1,
            max_stock: 4,
            stages: stages("tomato", [0.3, 0.6, 1.0]),
        },
        SeedDefinition {
            id: SeedId::from("corn"),
            display_name: "Corn".to_owned(),
            price: 200,
            grow_duration_ms: 2 * MINUTE_MS,
            initial_grow_duration_ms: None,
            min_weight: 0.2,
            max_weight: 0.5,
            sell_value: SellValue::Multiplier {
                base_sell_price: 1750.0,
            },
            is_multi_harvest: false,
            harvest_count: Harvests::ONCE,
            min_stock: 1,
            max_stock: 3,
            stages: stages("corn", [0.3, 0.7, 1.0]),
        },
    ]
}

/// Build the default catalog.
///
/// # Errors
///
/// Returns [`WorldError`] if a built-in definition fails validation.
pub fn starting_catalog() -> Result<SeedCatalog, WorldError> {
    SeedCatalog::from_definitions(default_seed_definitions())
}
