use crate::engine::EngineError;
use crate::variant::Variant;
use featherlay_core::{EntityId, RegistryKey};
use thiserror::Error;

/// Malformed static configuration. Raised where the configuration is built;
/// never substituted silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A drop table with no entries.
    #[error("drop table is empty")]
    EmptyTable,
    /// A weight that is negative, NaN or infinite.
    #[error("invalid weight {weight} for {item}")]
    InvalidWeight {
        /// Offending item.
        item: RegistryKey,
        /// Offending weight.
        weight: f64,
    },
    /// All weights are zero.
    #[error("drop table weights sum to zero")]
    ZeroTotalWeight,
    /// `min_spawn_tick > max_spawn_tick`.
    #[error("inverted spawn tick range: min={min}, max={max}")]
    InvertedTickRange {
        /// Configured minimum.
        min: u64,
        /// Configured maximum.
        max: u64,
    },
    /// `amount_min` of zero, or above `amount_max`.
    #[error("invalid amount range for {item}: min={min}, max={max}")]
    InvalidAmountRange {
        /// Offending item.
        item: RegistryKey,
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// A variant with no configuration in the table set.
    #[error("no configuration for variant {0}")]
    MissingVariant(Variant),
    /// Variant configured twice in one definition set.
    #[error("duplicate configuration for variant {0}")]
    DuplicateVariant(Variant),
    /// Variant name not recognized in a definition file.
    #[error("unknown variant name '{0}'")]
    UnknownVariantName(String),
}

/// Errors raised while processing a single creature. None of these abort a
/// scheduler pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayingError {
    /// The entity reports a variant with no matching configuration.
    #[error("entity {entity} has unknown variant {raw:?}")]
    UnknownVariant {
        /// Entity being processed.
        entity: EntityId,
        /// Raw variant component value, if any.
        raw: Option<i32>,
    },
    /// The entity became invalid mid-scan.
    #[error("entity {0} is no longer valid")]
    StaleEntity(EntityId),
    /// The host declined a production or property call.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Configuration defect surfaced while processing.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
