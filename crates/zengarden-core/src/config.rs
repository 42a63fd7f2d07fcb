//! Configuration loading and typed config structures for the Zen Garden.
//!
//! The configuration lives in `zengarden.yaml`. Every field has a default,
//! so a missing section (or an empty file) yields the classic game: 100
//! starting coins, a five-minute restock, and the carrot/tomato/corn
//! catalog.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use zengarden_economy::StockPolicy;
use zengarden_world::{SeedCatalog, SeedDefinition, WorldError, default_seed_definitions};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configured seed catalog is inconsistent.
    #[error("invalid seed catalog: {source}")]
    Catalog {
        /// The catalog validation failure.
        #[from]
        source: WorldError,
    },

    /// A scalar setting is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `zengarden.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Starting conditions and timing.
    #[serde(default)]
    pub garden: GardenConfig,

    /// Where and under which key the game is saved.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Shop restock behavior.
    #[serde(default)]
    pub shop: ShopConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The seed catalog, in shop order.
    #[serde(default = "default_seed_definitions")]
    pub seeds: Vec<SeedDefinition>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            garden: GardenConfig::default(),
            persistence: PersistenceConfig::default(),
            shop: ShopConfig::default(),
            logging: LoggingConfig::default(),
            seeds: default_seed_definitions(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error from [`GameConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty or whitespace-only document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error from [`GameConfig::validate`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check scalar settings and the seed catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero intervals, an empty storage
    /// key, or a zero shop budget, and [`ConfigError::Catalog`] for an
    /// inconsistent seed list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.garden.restock_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "garden.restock_interval_ms",
                reason: "must be positive",
            });
        }
        if self.garden.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "garden.tick_interval_ms",
                reason: "must be positive",
            });
        }
        if self.persistence.key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "persistence.key",
                reason: "must not be empty",
            });
        }
        if self.shop.stock_policy == (StockPolicy::PriceScaled { budget: 0 }) {
            return Err(ConfigError::Invalid {
                field: "shop.stock_policy.budget",
                reason: "must be positive",
            });
        }
        self.catalog()?;
        Ok(())
    }

    /// Build the validated seed catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] if the seed list is inconsistent.
    pub fn catalog(&self) -> Result<SeedCatalog, ConfigError> {
        Ok(SeedCatalog::from_definitions(self.seeds.clone())?)
    }
}

/// Starting conditions and timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GardenConfig {
    /// Coins in a brand-new game.
    #[serde(default = "default_starting_money")]
    pub starting_money: u64,

    /// Time between shop restocks in milliseconds.
    #[serde(default = "default_restock_interval_ms")]
    pub restock_interval_ms: u64,

    /// Fixed RNG seed for reproducible harvests and restocks.
    /// OS entropy is used when unset.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// How often the host drives the growth clock, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            starting_money: default_starting_money(),
            restock_interval_ms: default_restock_interval_ms(),
            rng_seed: None,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Save location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Storage key of the single save blob.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Directory used by the file-backed store.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            save_dir: default_save_dir(),
        }
    }
}

/// Shop configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShopConfig {
    /// How restock quantities are drawn.
    #[serde(default)]
    pub stock_policy: StockPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_starting_money() -> u64 {
    100
}

const fn default_restock_interval_ms() -> u64 {
    5 * 60 * 1_000
}

const fn default_tick_interval_ms() -> u64 {
    250
}

fn default_storage_key() -> String {
    String::from("myZenGardenSave")
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zengarden_types::Harvests;
    use zengarden_world::SellValue;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.garden.starting_money, 100);
        assert_eq!(config.garden.restock_interval_ms, 300_000);
        assert_eq!(config.persistence.key, "myZenGardenSave");
        assert_eq!(config.shop.stock_policy, StockPolicy::FixedRange);
        assert_eq!(config.catalog().unwrap().len(), 3);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = GameConfig::parse(include_str!("../../../zengarden.yaml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(GameConfig::parse("").unwrap(), GameConfig::default());
        assert_eq!(GameConfig::parse("  \n").unwrap(), GameConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
garden:
  starting_money: 250
  restock_interval_ms: 60000
  rng_seed: 7
  tick_interval_ms: 100

persistence:
  key: "testSave"
  save_dir: "/tmp/zen"

shop:
  stock_policy:
    kind: price_scaled
    budget: 400

logging:
  level: "debug"

seeds:
  - id: radish
    display_name: Radish
    price: 5
    grow_duration_ms: 10000
    min_weight: 0.05
    max_weight: 0.15
    sell_value:
      base_sell_price: 200
    min_stock: 3
    max_stock: 9
  - id: berry
    display_name: Berry Bush
    price: 80
    grow_duration_ms: 30000
    initial_grow_duration_ms: 60000
    min_weight: 0.1
    max_weight: 0.2
    sell_value:
      min_sell_price: 90
      max_sell_price: 160
    is_multi_harvest: true
    harvest_count: 4
    min_stock: 1
    max_stock: 2
    stages:
      - { threshold: 0.0, key: sprout }
      - { threshold: 1.0, key: berry_ripe }
"#;
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.garden.starting_money, 250);
        assert_eq!(config.garden.rng_seed, Some(7));
        assert_eq!(config.persistence.save_dir, PathBuf::from("/tmp/zen"));
        assert_eq!(
            config.shop.stock_policy,
            StockPolicy::PriceScaled { budget: 400 }
        );
        assert_eq!(config.logging.level, "debug");

        let catalog = config.catalog().unwrap();
        let ids: Vec<_> = catalog.ids().map(|id| id.as_str().to_owned()).collect();
        assert_eq!(ids, vec!["radish", "berry"]);

        let radish = catalog.get("radish").unwrap();
        assert!(matches!(radish.sell_value, SellValue::Multiplier { .. }));
        assert_eq!(radish.harvest_count, Harvests::ONCE);

        let berry = catalog.get("berry").unwrap();
        assert_eq!(berry.harvest_count, Harvests::Finite(4));
        assert_eq!(berry.initial_grow_duration_ms, Some(60_000));
        assert!(matches!(
            berry.sell_value,
            SellValue::Range {
                min_sell_price: 90,
                max_sell_price: 160
            }
        ));
    }

    #[test]
    fn infinite_harvest_count_accepts_word_and_sentinel() {
        for count in ["infinite", "-1"] {
            let yaml = format!(
                "seeds:\n  - id: vine\n    display_name: Vine\n    price: 1\n    grow_duration_ms: 1000\n    min_weight: 0.1\n    max_weight: 0.2\n    sell_value: {{ base_sell_price: 10 }}\n    is_multi_harvest: true\n    harvest_count: {count}\n    min_stock: 1\n    max_stock: 1\n"
            );
            let config = GameConfig::parse(&yaml).unwrap();
            assert_eq!(config.seeds.first().unwrap().harvest_count, Harvests::Infinite);
        }
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = GameConfig::parse("garden:\n  starting_money: 5\n").unwrap();
        assert_eq!(config.garden.starting_money, 5);
        assert_eq!(config.garden.restock_interval_ms, 300_000);
        assert_eq!(config.seeds.len(), 3);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            GameConfig::parse("garden:\n  restock_interval_ms: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            GameConfig::parse("persistence:\n  key: \"\"\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            GameConfig::parse("shop:\n  stock_policy: { kind: price_scaled, budget: 0 }\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(GameConfig::parse("seeds: []\n"), Err(ConfigError::Catalog { .. })));
        assert!(matches!(GameConfig::parse("garden: [1, 2"), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = GameConfig::from_file(Path::new("/nonexistent/zengarden.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
