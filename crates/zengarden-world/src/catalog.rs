//! Seed catalog: the static registry of seed definitions.
//!
//! The catalog is loaded once at startup (from configuration or the built-in
//! [`starting_catalog`](crate::starting_catalog::starting_catalog)) and is
//! read-only afterwards. Every seed-keyed map elsewhere in the game
//! (inventory, shop stock) is initialized from [`SeedCatalog::ids`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zengarden_types::{Harvests, SeedId};

use crate::error::WorldError;

// ---------------------------------------------------------------------------
// Sell-value parameters
// ---------------------------------------------------------------------------

/// How a seed's harvest is appraised.
///
/// Exactly one parameter set is configured per seed. The active formula for
/// each variant lives in the economy crate's pricing module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SellValue {
    /// Value is linear in weight: `base_sell_price * weight`.
    Multiplier {
        /// Coins per kilogram.
        base_sell_price: f64,
    },
    /// Value interpolates across the weight range between two bounds.
    Range {
        /// Value of a minimum-weight crop.
        min_sell_price: u64,
        /// Value of a maximum-weight crop.
        max_sell_price: u64,
    },
}

// ---------------------------------------------------------------------------
// Growth stages
// ---------------------------------------------------------------------------

/// A renderer hint: which visual to show once growth passes `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStage {
    /// Fraction of the grow duration in `[0, 1]`.
    pub threshold: f64,
    /// Opaque visual key understood by the renderer.
    pub key: String,
}

// ---------------------------------------------------------------------------
// SeedDefinition
// ---------------------------------------------------------------------------

/// Immutable configuration of one seed type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDefinition {
    /// Catalog key.
    pub id: SeedId,
    /// Human-readable name ("Carrot").
    pub display_name: String,
    /// Purchase cost in coins.
    pub price: u64,
    /// Time from planting (or regrowth) to ready, in milliseconds.
    pub grow_duration_ms: u64,
    /// Override of `grow_duration_ms` for the first growth cycle only.
    #[serde(default)]
    pub initial_grow_duration_ms: Option<u64>,
    /// Lightest possible harvest in kilograms.
    pub min_weight: f64,
    /// Heaviest possible harvest in kilograms.
    pub max_weight: f64,
    /// Appraisal parameters.
    pub sell_value: SellValue,
    /// Whether the plant regrows after harvest.
    #[serde(default)]
    pub is_multi_harvest: bool,
    /// Harvests per planting for multi-harvest seeds.
    #[serde(default = "default_harvest_count")]
    pub harvest_count: Harvests,
    /// Lower bound of a restocked quantity.
    pub min_stock: u32,
    /// Upper bound of a restocked quantity and of shop stock in general.
    pub max_stock: u32,
    /// Visual growth stages, ordered by threshold.
    #[serde(default)]
    pub stages: Vec<GrowthStage>,
}

const fn default_harvest_count() -> Harvests {
    Harvests::ONCE
}

impl SeedDefinition {
    /// Grow duration that applies to a plant's current cycle.
    pub fn grow_duration_for(&self, first_cycle: bool) -> u64 {
        if first_cycle {
            self.initial_grow_duration_ms.unwrap_or(self.grow_duration_ms)
        } else {
            self.grow_duration_ms
        }
    }

    /// Harvest credits a fresh planting receives.
    pub const fn initial_harvests(&self) -> Harvests {
        if self.is_multi_harvest {
            self.harvest_count
        } else {
            Harvests::ONCE
        }
    }

    /// Visual key of the last stage whose threshold `progress` has reached.
    pub fn stage_for(&self, progress: f64) -> Option<&str> {
        self.stages
            .iter()
            .rev()
            .find(|stage| stage.threshold <= progress)
            .map(|stage| stage.key.as_str())
    }

    /// Check internal consistency of the definition.
    pub fn validate(&self) -> Result<(), WorldError> {
        let invalid = |reason: &str| WorldError::InvalidSeedDefinition {
            seed_id: self.id.clone(),
            reason: reason.to_owned(),
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("seed id must not be empty"));
        }
        if self.grow_duration_ms == 0 || self.initial_grow_duration_ms == Some(0) {
            return Err(invalid("grow durations must be positive"));
        }
        if !self.min_weight.is_finite()
            || !self.max_weight.is_finite()
            || self.min_weight < 0.0
            || self.min_weight > self.max_weight
        {
            return Err(invalid("weights must satisfy 0 <= min_weight <= max_weight"));
        }
        match self.sell_value {
            SellValue::Multiplier { base_sell_price } => {
                if !base_sell_price.is_finite() || base_sell_price < 0.0 {
                    return Err(invalid("base_sell_price must be a non-negative number"));
                }
            }
            SellValue::Range {
                min_sell_price,
                max_sell_price,
            } => {
                if min_sell_price > max_sell_price {
                    return Err(invalid("min_sell_price must not exceed max_sell_price"));
                }
            }
        }
        if self.harvest_count == Harvests::Finite(0) {
            return Err(invalid("harvest_count must be positive"));
        }
        if self.min_stock > self.max_stock {
            return Err(invalid("min_stock must not exceed max_stock"));
        }
        if self
            .stages
            .iter()
            .any(|stage| !(0.0..=1.0).contains(&stage.threshold))
        {
            return Err(invalid("stage thresholds must lie in [0, 1]"));
        }
        if self
            .stages
            .windows(2)
            .any(|pair| matches!(pair, [a, b] if a.threshold > b.threshold))
        {
            return Err(invalid("stages must be ordered by threshold"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SeedCatalog
// ---------------------------------------------------------------------------

/// Read-only registry of seed definitions, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedCatalog {
    /// Definitions in configuration order.
    definitions: Vec<SeedDefinition>,
    /// Seed id to position in `definitions`.
    index: BTreeMap<SeedId, usize>,
}

impl SeedCatalog {
    /// Build a catalog, validating every definition.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyCatalog`] for an empty list,
    /// [`WorldError::DuplicateSeed`] when two definitions share an id, or
    /// [`WorldError::InvalidSeedDefinition`] for an inconsistent entry.
    pub fn from_definitions(definitions: Vec<SeedDefinition>) -> Result<Self, WorldError> {
        if definitions.is_empty() {
            return Err(WorldError::EmptyCatalog);
        }
        let mut index = BTreeMap::new();
        for (position, def) in definitions.iter().enumerate() {
            def.validate()?;
            if index.insert(def.id.clone(), position).is_some() {
                return Err(WorldError::DuplicateSeed(def.id.clone()));
            }
        }
        Ok(Self { definitions, index })
    }

    /// Look up a seed definition.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownSeed`] if the id is not in the catalog.
    pub fn get(&self, seed_id: &str) -> Result<&SeedDefinition, WorldError> {
        self.find(seed_id)
            .ok_or_else(|| WorldError::UnknownSeed(SeedId::from(seed_id)))
    }

    /// Look up a seed definition, returning `None` if unknown.
    pub fn find(&self, seed_id: &str) -> Option<&SeedDefinition> {
        self.index
            .get(seed_id)
            .and_then(|&position| self.definitions.get(position))
    }

    /// Resolve a loosely-specified seed reference from older save data.
    ///
    /// Tries the exact id, then a case-insensitive id, then the display name.
    pub fn resolve(&self, reference: &str) -> Option<&SeedDefinition> {
        self.find(reference).or_else(|| {
            self.definitions.iter().find(|def| {
                def.id.as_str().eq_ignore_ascii_case(reference)
                    || def.display_name.eq_ignore_ascii_case(reference)
            })
        })
    }

    /// Whether the catalog contains `seed_id`.
    pub fn contains(&self, seed_id: &str) -> bool {
        self.index.contains_key(seed_id)
    }

    /// All seed ids in configuration order.
    pub fn ids(&self) -> impl Iterator<Item = &SeedId> {
        self.definitions.iter().map(|def| &def.id)
    }

    /// All definitions in configuration order.
    pub fn definitions(&self) -> &[SeedDefinition] {
        &self.definitions
    }

    /// Number of seed types.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always `false` for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::starting_catalog::default_seed_definitions;

    fn carrot() -> SeedDefinition {
        default_seed_definitions()
            .into_iter()
            .find(|d| d.id.as_str() == "carrot")
            .unwrap()
    }

    #[test]
    fn lookup_known_and_unknown() {
        let catalog = SeedCatalog::from_definitions(default_seed_definitions()).unwrap();
        assert_eq!(catalog.get("carrot").unwrap().price, 10);
        assert!(matches!(catalog.get("kale"), Err(WorldError::UnknownSeed(_))));
    }

    #[test]
    fn ids_keep_configuration_order() {
        let catalog = SeedCatalog::from_definitions(default_seed_definitions()).unwrap();
        let ids: Vec<&str> = catalog.ids().map(SeedId::as_str).collect();
        assert_eq!(ids, vec!["carrot", "tomato", "corn"]);
    }

    #[test]
    fn resolve_accepts_display_names() {
        let catalog = SeedCatalog::from_definitions(default_seed_definitions()).unwrap();
        assert_eq!(catalog.resolve("Carrot").map(|d| d.id.as_str()), Some("carrot"));
        assert_eq!(catalog.resolve("CORN").map(|d| d.id.as_str()), Some("corn"));
        assert!(catalog.resolve("Pumpkin").is_none());
    }

    #[test]
    fn rejects_duplicates() {
        let result = SeedCatalog::from_definitions(vec![carrot(), carrot()]);
        assert!(matches!(result, Err(WorldError::DuplicateSeed(_))));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            SeedCatalog::from_definitions(Vec::new()),
            Err(WorldError::EmptyCatalog)
        ));
    }

    #[test]
    fn rejects_inverted_weight_range() {
        let mut def = carrot();
        def.min_weight = 0.5;
        def.max_weight = 0.1;
        assert!(def.validate().is_err());
    }

    #[test]
    fn rejects_inverted_stock_range() {
        let mut def = carrot();
        def.min_stock = 9;
        def.max_stock = 2;
        assert!(def.validate().is_err());
    }

    #[test]
    fn rejects_zero_harvest_count() {
        let mut def = carrot();
        def.is_multi_harvest = true;
        def.harvest_count = Harvests::Finite(0);
        assert!(def.validate().is_err());
    }

    #[test]
    fn rejects_unordered_or_out_of_range_stages() {
        let mut def = carrot();
        def.stages.reverse();
        assert!(def.validate().is_err());

        let mut def = carrot();
        def.stages.last_mut().unwrap().threshold = 1.5;
        assert!(def.validate().is_err());

        let mut def = carrot();
        def.stages.first_mut().unwrap().threshold = f64::NAN;
        assert!(def.validate().is_err());

        assert!(carrot().validate().is_ok());
    }

    #[test]
    fn first_cycle_uses_initial_duration() {
        let mut def = carrot();
        def.initial_grow_duration_ms = Some(30_000);
        assert_eq!(def.grow_duration_for(true), 30_000);
        assert_eq!(def.grow_duration_for(false), def.grow_duration_ms);
    }

    #[test]
    fn stage_for_picks_highest_reached_threshold() {
        let def = carrot();
        assert_eq!(def.stage_for(0.0), Some("seedling"));
        assert_eq!(def.stage_for(0.5), Some("sprout"));
        assert_eq!(def.stage_for(1.0), Some("carrot_ripe"));
    }

    #[test]
    fn non_multi_harvest_gets_single_credit() {
        let mut def = carrot();
        def.harvest_count = Harvests::Finite(4);
        assert_eq!(def.initial_harvests(), Harvests::ONCE);
        def.is_multi_harvest = true;
        assert_eq!(def.initial_harvests(), Harvests::Finite(4));
    }

    #[test]
    fn definition_parses_from_json_with_defaults() {
        let json = r#"{
            "id": "radish",
            "display_name": "Radish",
            "price": 5,
            "grow_duration_ms": 1000,
            "min_weight": 0.05,
            "max_weight": 0.1,
            "sell_value": { "min_sell_price": 6, "max_sell_price": 12 },
            "min_stock": 1,
            "max_stock": 4
        }"#;
        let def: SeedDefinition = serde_json::from_str(json).unwrap();
        assert!(!def.is_multi_harvest);
        assert_eq!(def.harvest_count, Harvests::ONCE);
        assert_eq!(
            def.sell_value,
            SellValue::Range {
                min_sell_price: 6,
                max_sell_price: 12
            }
        );
        assert!(def.validate().is_ok());
    }
}
