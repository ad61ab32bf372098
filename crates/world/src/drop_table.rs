//! Per-variant drop tables and timer ranges.
//!
//! Tables are validated once when built. After that, sampling a
//! [`DropTable`] cannot fail and the scheduler never sees a malformed table.

use crate::error::ConfigError;
use crate::sampler;
use crate::variant::Variant;
use featherlay_core::RegistryKey;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Timer range used when a variant definition leaves it out (120-240 s).
pub const DEFAULT_SPAWN_TICK_RANGE: (u64, u64) = (120 * 20, 240 * 20);

/// One weighted entry of a drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    /// Item to produce.
    pub item: RegistryKey,
    /// Relative weight.
    pub weight: f64,
    /// Minimum stack size produced.
    #[serde(default = "one")]
    pub amount_min: u32,
    /// Maximum stack size produced.
    #[serde(default = "one")]
    pub amount_max: u32,
}

fn one() -> u32 {
    1
}

impl DropEntry {
    /// Entry producing exactly one item.
    pub fn new(item: RegistryKey, weight: f64) -> Self {
        Self {
            item,
            weight,
            amount_min: 1,
            amount_max: 1,
        }
    }

    /// Set the produced quantity range.
    pub fn with_amount(mut self, min: u32, max: u32) -> Self {
        self.amount_min = min;
        self.amount_max = max;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.amount_min == 0 || self.amount_min > self.amount_max {
            return Err(ConfigError::InvalidAmountRange {
                item: self.item.clone(),
                min: self.amount_min,
                max: self.amount_max,
            });
        }
        Ok(())
    }
}

/// A validated, non-empty list of weighted entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    entries: Vec<DropEntry>,
    total_weight: f64,
}

impl DropTable {
    /// Validate and build a table.
    pub fn new(entries: Vec<DropEntry>) -> Result<Self, ConfigError> {
        let total_weight = sampler::total_weight(&entries)?;
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// Entries in declared order.
    pub fn entries(&self) -> &[DropEntry] {
        &self.entries
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Draw one entry with probability proportional to its weight.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> &DropEntry {
        sampler::pick(&self.entries, rng.gen_range(0.0..self.total_weight))
    }
}

/// Drop table plus laying interval for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantConfig {
    items: DropTable,
    min_spawn_tick: u64,
    max_spawn_tick: u64,
}

impl VariantConfig {
    /// Build a config; the tick range must not be inverted.
    pub fn new(items: DropTable, min_spawn_tick: u64, max_spawn_tick: u64) -> Result<Self, ConfigError> {
        if min_spawn_tick > max_spawn_tick {
            return Err(ConfigError::InvertedTickRange {
                min: min_spawn_tick,
                max: max_spawn_tick,
            });
        }
        Ok(Self {
            items,
            min_spawn_tick,
            max_spawn_tick,
        })
    }

    /// Drop table.
    pub fn items(&self) -> &DropTable {
        &self.items
    }

    /// Shortest laying interval in ticks.
    pub fn min_spawn_tick(&self) -> u64 {
        self.min_spawn_tick
    }

    /// Longest laying interval in ticks.
    pub fn max_spawn_tick(&self) -> u64 {
        self.max_spawn_tick
    }
}

/// Configuration for every [`Variant`].
#[derive(Debug, Clone, PartialEq)]
pub struct DropTables {
    configs: BTreeMap<Variant, VariantConfig>,
}

impl DropTables {
    /// Build from a complete variant map; every variant must be present.
    pub fn new(configs: BTreeMap<Variant, VariantConfig>) -> Result<Self, ConfigError> {
        if let Some(missing) = Variant::ALL.into_iter().find(|v| !configs.contains_key(v)) {
            return Err(ConfigError::MissingVariant(missing));
        }
        Ok(Self { configs })
    }

    /// Built-in tables shipped with the add-on.
    pub fn builtin() -> Self {
        let entry = |path, weight| DropEntry::new(RegistryKey::vanilla(path), weight);
        let table = |entries| DropTable::new(entries).expect("built-in table is valid");
        let config = |entries, min, max| {
            VariantConfig::new(table(entries), min, max).expect("built-in range is valid")
        };

        let configs = BTreeMap::from([
            (
                Variant::Base,
                config(
                    vec![entry("egg", 50.0), entry("blue_egg", 25.0), entry("brown_egg", 25.0)],
                    60 * 20,
                    120 * 20,
                ),
            ),
            (
                Variant::Stone,
                config(
                    vec![entry("stone", 25.0), entry("cobblestone", 75.0)],
                    30 * 20,
                    60 * 20,
                ),
            ),
            (
                Variant::Zombie,
                config(
                    vec![
                        entry("rotten_flesh", 90.0),
                        entry("carrot", 3.0),
                        entry("potato", 3.0),
                        entry("iron_ingot", 2.0),
                        entry("poisonous_potato", 1.0),
                        entry("zombie_head", 1.0),
                    ],
                    30 * 20,
                    60 * 20,
                ),
            ),
        ]);
        Self { configs }
    }

    /// Config for `variant`.
    pub fn get(&self, variant: Variant) -> &VariantConfig {
        // `new` and `builtin` guarantee every variant is present.
        &self.configs[&variant]
    }

    /// Replace the configs named in `file`, keeping the rest.
    ///
    /// All definitions are validated before anything is replaced, so a bad
    /// file never leaves a half-applied table set.
    pub fn with_definitions(&self, file: &DropTableFile) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();
        let mut replaced = self.configs.clone();
        for def in &file.variants {
            let variant = Variant::parse(&def.variant)
                .ok_or_else(|| ConfigError::UnknownVariantName(def.variant.clone()))?;
            if !seen.insert(variant) {
                return Err(ConfigError::DuplicateVariant(variant));
            }
            replaced.insert(variant, def.to_config()?);
        }
        Ok(Self { configs: replaced })
    }

    /// Iterate configs in variant order.
    pub fn iter(&self) -> impl Iterator<Item = (Variant, &VariantConfig)> {
        self.configs.iter().map(|(v, c)| (*v, c))
    }
}

impl Default for DropTables {
    fn default() -> Self {
        Self::builtin()
    }
}

/// On-disk drop table pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DropTableFile {
    /// Variant overrides.
    #[serde(default)]
    pub variants: Vec<VariantDefinition>,
}

/// One variant as written in a pack file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDefinition {
    /// Variant key (`base`, `stone`, `zombie`).
    pub variant: String,
    /// Weighted entries.
    pub items: Vec<DropEntry>,
    /// Shortest laying interval; defaults to [`DEFAULT_SPAWN_TICK_RANGE`].
    #[serde(default)]
    pub min_spawn_tick: Option<u64>,
    /// Longest laying interval; defaults to [`DEFAULT_SPAWN_TICK_RANGE`].
    #[serde(default)]
    pub max_spawn_tick: Option<u64>,
}

impl VariantDefinition {
    fn to_config(&self) -> Result<VariantConfig, ConfigError> {
        let table = DropTable::new(self.items.clone())?;
        VariantConfig::new(
            table,
            self.min_spawn_tick.unwrap_or(DEFAULT_SPAWN_TICK_RANGE.0),
            self.max_spawn_tick.unwrap_or(DEFAULT_SPAWN_TICK_RANGE.1),
        )
    }
}
