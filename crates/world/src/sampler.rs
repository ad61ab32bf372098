//! Weighted drop selection.
//!
//! Drop tables are tiny (a handful of entries), so selection is a linear walk
//! that subtracts weights in declared order. The walk is easy to audit and
//! gives the same answer for the same random draw.

use crate::drop_table::DropEntry;
use crate::error::ConfigError;
use rand::Rng;

/// Total weight of `entries`, validating each weight on the way.
pub fn total_weight(entries: &[DropEntry]) -> Result<f64, ConfigError> {
    if entries.is_empty() {
        return Err(ConfigError::EmptyTable);
    }
    let mut total = 0.0;
    for entry in entries {
        if !entry.weight.is_finite() || entry.weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                item: entry.item.clone(),
                weight: entry.weight,
            });
        }
        total += entry.weight;
    }
    if total <= 0.0 || !total.is_finite() {
        return Err(ConfigError::ZeroTotalWeight);
    }
    Ok(total)
}

/// Draw one entry with probability proportional to its weight.
pub fn sample<'a, R: Rng>(
    entries: &'a [DropEntry],
    rng: &mut R,
) -> Result<&'a DropEntry, ConfigError> {
    let total = total_weight(entries)?;
    Ok(pick(entries, rng.gen_range(0.0..total)))
}

/// Walk `entries` subtracting weights from `roll` (a value in `[0, total)`)
/// and return the first weighted entry where the remainder reaches zero.
///
/// Falls back to the last entry if rounding exhausts the walk without a hit.
pub(crate) fn pick(entries: &[DropEntry], mut roll: f64) -> &DropEntry {
    for entry in entries {
        roll -= entry.weight;
        if roll <= 0.0 && entry.weight > 0.0 {
            return entry;
        }
    }
    &entries[entries.len() - 1]
}

/// Quantity to produce for `entry`, uniform in `[amount_min, amount_max]`.
pub fn roll_amount<R: Rng>(entry: &DropEntry, rng: &mut R) -> u32 {
    if entry.amount_min >= entry.amount_max {
        entry.amount_min
    } else {
        rng.gen_range(entry.amount_min..=entry.amount_max)
    }
}
