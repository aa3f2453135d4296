//! # Store Configuration
//!
//! Everything the store needs to know before the first table is opened.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAFE_TAX_RATE=8.5                                                  │
//! │     CAFE_CONSUMPTION=on_order_completed                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $CAFE_CONFIG, or                                                   │
//! │     ~/.config/pos/store.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.cafe.pos/store.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8 tables, 10% tax, consumption disabled                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! [store]
//! name = "Corner Cafe"
//! currency_symbol = "$"
//!
//! [tables]
//! seats = [2, 2, 4, 4, 4, 6, 6, 8]
//!
//! [billing]
//! tax_rate_bps = 1000
//!
//! [inventory]
//! consumption = "disabled"  # disabled | on_item_ready | on_item_served | on_order_completed
//!
//! [events]
//! channel_capacity = 256
//!
//! [seed]
//! sample_catalog = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use cafe_core::validation::{validate_capacity, validate_tax_rate_bps};
use cafe_core::{TaxRate, DEFAULT_TAX_RATE_BPS};

use crate::consumption::ConsumptionPolicy;
use crate::error::{ConfigError, ConfigResult};
use crate::events::DEFAULT_CHANNEL_CAPACITY;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CAFE_CONFIG";

// =============================================================================
// Sections
// =============================================================================

/// Identity printed on bills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Display only. Amounts are always integer cents.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Cafe POS".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// The floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesSection {
    /// Seats per table. Table numbers follow list order, starting at 1.
    #[serde(default = "default_seats")]
    pub seats: Vec<u32>,
}

fn default_seats() -> Vec<u32> {
    vec![2, 2, 4, 4, 4, 6, 6, 8]
}

impl Default for TablesSection {
    fn default() -> Self {
        TablesSection {
            seats: default_seats(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSection {
    /// Bill tax in basis points (1000 = 10%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

impl Default for BillingSection {
    fn default() -> Self {
        BillingSection {
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySection {
    /// When orders draw stock down through recipes.
    #[serde(default)]
    pub consumption: ConsumptionPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsSection {
    /// Broadcast buffer per subscriber. Slow subscribers lag past this.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for EventsSection {
    fn default() -> Self {
        EventsSection {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Used by the `seed` binary only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedSection {
    #[serde(default = "default_true")]
    pub sample_catalog: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SeedSection {
    fn default() -> Self {
        SeedSection {
            sample_catalog: true,
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub tables: TablesSection,

    #[serde(default)]
    pub billing: BillingSection,

    #[serde(default)]
    pub inventory: InventorySection,

    #[serde(default)]
    pub events: EventsSection,

    #[serde(default)]
    pub seed: SeedSection,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path`, else `$CAFE_CONFIG`, else the platform
    ///    config dir. A missing file is not an error.
    /// 3. Environment variables
    ///
    /// ## Errors
    /// - `Io` / `Parse` if the file exists but cannot be read
    /// - `Invalid` if the merged result fails [`StoreConfig::validate`]
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the config as pretty TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tables.seats.is_empty() {
            return Err(ConfigError::invalid("at least one table is required"));
        }

        for (seats, number) in self.tables.seats.iter().zip(1u32..) {
            validate_capacity(*seats)
                .map_err(|e| ConfigError::invalid(format!("table {}: {}", number, e)))?;
        }

        validate_tax_rate_bps(self.billing.tax_rate_bps)
            .map_err(|e| ConfigError::invalid(e.to_string()))?;

        if self.events.channel_capacity == 0 {
            return Err(ConfigError::invalid(
                "events.channel_capacity must be greater than 0",
            ));
        }

        if self.store.name.trim().is_empty() {
            return Err(ConfigError::invalid("store.name must not be empty"));
        }

        Ok(())
    }

    /// Applies `CAFE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("CAFE_STORE_NAME") {
            debug!(name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        // Percent, to match what the settings screen shows.
        if let Some(rate) = lookup("CAFE_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) if pct.is_finite() && pct >= 0.0 => {
                    let bps = TaxRate::from_percentage(pct).bps();
                    debug!(bps, "Overriding tax rate from environment");
                    self.billing.tax_rate_bps = bps;
                }
                _ => warn!(value = %rate, "Ignoring invalid CAFE_TAX_RATE"),
            }
        }

        if let Some(seats) = lookup("CAFE_TABLE_SEATS") {
            let parsed: Result<Vec<u32>, _> = seats
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::parse::<u32>)
                .collect();
            match parsed {
                Ok(list) if !list.is_empty() => {
                    debug!(tables = list.len(), "Overriding floor plan from environment");
                    self.tables.seats = list;
                }
                _ => warn!(value = %seats, "Ignoring invalid CAFE_TABLE_SEATS"),
            }
        }

        if let Some(policy) = lookup("CAFE_CONSUMPTION") {
            match policy.parse::<ConsumptionPolicy>() {
                Ok(parsed) => {
                    debug!(policy = %parsed, "Overriding consumption policy from environment");
                    self.inventory.consumption = parsed;
                }
                Err(_) => warn!(value = %policy, "Unknown consumption policy in environment"),
            }
        }

        if let Some(flag) = lookup("CAFE_SAMPLE_CATALOG") {
            match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.seed.sample_catalog = true,
                "0" | "false" | "no" | "off" => self.seed.sample_catalog = false,
                _ => warn!(value = %flag, "Ignoring invalid CAFE_SAMPLE_CATALOG"),
            }
        }
    }

    /// Platform config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cafe", "pos")
            .map(|dirs| dirs.config_dir().join("store.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.billing.tax_rate_bps)
    }

    pub fn table_count(&self) -> usize {
        self.tables.seats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.store.name, "Cafe POS");
        assert_eq!(config.table_count(), 8);
        assert_eq!(config.tax_rate().bps(), 1000);
        assert_eq!(config.inventory.consumption, ConsumptionPolicy::Disabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: StoreConfig = toml::from_str(
            r#"
            [billing]
            tax_rate_bps = 850

            [inventory]
            consumption = "on_item_served"
            "#,
        )
        .unwrap();

        assert_eq!(config.tax_rate().bps(), 850);
        assert_eq!(config.inventory.consumption, ConsumptionPolicy::OnItemServed);
        assert_eq!(config.tables.seats, default_seats());
        assert_eq!(config.events.channel_capacity, 256);
    }

    #[test]
    fn test_config_validation() {
        let mut config = StoreConfig::default();

        config.tables.seats.clear();
        assert!(config.validate().is_err());

        config.tables.seats = vec![4, 0];
        assert!(config.validate().is_err());

        config.tables.seats = vec![4];
        config.billing.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());

        config.billing.tax_rate_bps = 1000;
        config.events.channel_capacity = 0;
        assert!(config.validate().is_err());

        config.events.channel_capacity = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = StoreConfig::default();
        config.apply_overrides_from(env(&[
            ("CAFE_STORE_NAME", "Corner Cafe"),
            ("CAFE_TAX_RATE", "8.5"),
            ("CAFE_TABLE_SEATS", "2, 4,6"),
            ("CAFE_CONSUMPTION", "on_order_completed"),
            ("CAFE_SAMPLE_CATALOG", "no"),
        ]));

        assert_eq!(config.store.name, "Corner Cafe");
        assert_eq!(config.billing.tax_rate_bps, 850);
        assert_eq!(config.tables.seats, vec![2, 4, 6]);
        assert_eq!(
            config.inventory.consumption,
            ConsumptionPolicy::OnOrderCompleted
        );
        assert!(!config.seed.sample_catalog);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = StoreConfig::default();
        config.apply_overrides_from(env(&[
            ("CAFE_TAX_RATE", "lots"),
            ("CAFE_TABLE_SEATS", "2,x"),
            ("CAFE_CONSUMPTION", "sometimes"),
            ("CAFE_SAMPLE_CATALOG", "maybe"),
        ]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.toml");

        let mut config = StoreConfig::default();
        config.store.name = "Harbour Cafe".to_string();
        config.tables.seats = vec![2, 2, 10];
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[tables]"));

        let loaded: StoreConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "[tables]\nseats = []\n").unwrap();

        assert!(matches!(
            StoreConfig::load(Some(path.clone())),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(&path, "[tables\n").unwrap();
        assert!(matches!(
            StoreConfig::load(Some(path)),
            Err(ConfigError::Parse(_))
        ));
    }
}
