//! Resource chicken variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type id of the resource chicken.
pub const CHICKEN_TYPE_ID: &str = "featherlay:resource_chicken";

/// Creature sub-type, selected by the entity's variant component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Plain chicken laying eggs.
    Base,
    /// Lays stone and cobblestone.
    Stone,
    /// Lays rotten flesh with rare vegetables and loot.
    Zombie,
}

impl Variant {
    /// All variants in component order.
    pub const ALL: [Variant; 3] = [Variant::Base, Variant::Stone, Variant::Zombie];

    /// Resolve the raw variant component value.
    pub const fn from_component(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Variant::Base),
            1 => Some(Variant::Stone),
            2 => Some(Variant::Zombie),
            _ => None,
        }
    }

    /// Raw variant component value.
    pub const fn component_value(self) -> i32 {
        match self {
            Variant::Base => 0,
            Variant::Stone => 1,
            Variant::Zombie => 2,
        }
    }

    /// Canonical lowercase key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::Stone => "stone",
            Variant::Zombie => "zombie",
        }
    }

    /// Parse a variant key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "base" => Some(Variant::Base),
            "stone" => Some(Variant::Stone),
            "zombie" => Some(Variant::Zombie),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
