//! Dimension identifiers.
//!
//! Live entity queries on the host are dimension-scoped, so the laying
//! scheduler needs to name the dimension it enumerates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a world dimension.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DimensionId {
    /// The Overworld dimension.
    #[default]
    Overworld,
    /// The Nether dimension.
    Nether,
    /// The End dimension.
    End,
}

impl DimensionId {
    /// Every dimension, in a stable order.
    pub const ALL: [Self; 3] = [Self::Overworld, Self::Nether, Self::End];

    /// Host-facing string key (`overworld`, `nether`, `the_end`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Nether => "nether",
            Self::End => "the_end",
        }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_host_keys() {
        let keys: Vec<_> = DimensionId::ALL.iter().map(|d| d.to_string()).collect();
        assert_eq!(keys, vec!["overworld", "nether", "the_end"]);
    }
}
