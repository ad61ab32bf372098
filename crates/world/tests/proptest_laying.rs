//! Property-based tests for laying invariants
//!
//! Validates:
//! - Sampling always returns a weighted entry from the table
//! - Fresh deadlines land inside the configured window
//! - Registry observation is idempotent and removal is exact
//! - Retry counts never exceed the configured maximum

use featherlay_core::{DimensionId, EntityId, RegistryKey, SimTick};
use featherlay_world::{
    CreatureRegistry, DropEntry, DropTable, TimerPolicy, VariantConfig, CHICKEN_TYPE_ID,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

const ITEMS: [&str; 6] = ["egg", "stone", "cobblestone", "carrot", "potato", "iron_ingot"];

fn table_strategy() -> impl Strategy<Value = Vec<DropEntry>> {
    prop::collection::vec(0.0f64..100.0, 1..=ITEMS.len())
        .prop_filter("at least one positive weight", |weights| {
            weights.iter().any(|w| *w > 0.0)
        })
        .prop_map(|weights| {
            weights
                .into_iter()
                .enumerate()
                .map(|(i, w)| DropEntry::new(RegistryKey::vanilla(ITEMS[i]), w))
                .collect()
        })
}

proptest! {
    /// Property: a sampled entry is always one of the table's weighted entries.
    #[test]
    fn sample_returns_weighted_member(entries in table_strategy(), seed in any::<u64>()) {
        let table = DropTable::new(entries.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..32 {
            let picked = table.sample(&mut rng);
            prop_assert!(entries.iter().any(|e| e.item == picked.item && e.weight > 0.0));
        }
    }

    /// Property: fresh deadlines satisfy `now + min <= deadline <= now + max`.
    #[test]
    fn next_deadline_within_window(
        now in 0u64..1_000_000,
        min in 0u64..5_000,
        span in 0u64..5_000,
        seed in any::<u64>(),
    ) {
        let table = DropTable::new(vec![DropEntry::new(RegistryKey::vanilla("egg"), 1.0)]).unwrap();
        let config = VariantConfig::new(table, min, min + span).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let SimTick(deadline) = TimerPolicy::default().next_deadline(&config, SimTick(now), &mut rng);
        prop_assert!(deadline >= now + min);
        prop_assert!(deadline <= now + min + span);
    }

    /// Property: the persisted retry count stays within `[0, max_retries]`.
    #[test]
    fn retry_count_is_bounded(max_retries in 0u32..6, failures in 0usize..40) {
        let policy = TimerPolicy { base_backoff: 20, max_retries };
        let table = DropTable::new(vec![DropEntry::new(RegistryKey::vanilla("egg"), 1.0)]).unwrap();
        let config = VariantConfig::new(table, 100, 200).unwrap();
        let mut rng = StdRng::seed_from_u64(failures as u64);
        let mut count = 0;
        let mut now = SimTick::ZERO;
        for _ in 0..failures {
            let retry = policy.after_failure(count, &config, now, &mut rng);
            prop_assert!(retry.retry_count <= max_retries);
            prop_assert!(retry.deadline > now || policy.base_backoff == 0);
            count = retry.retry_count;
            now = retry.deadline;
        }
    }

    /// Property: observing the same ids any number of times tracks each once,
    /// and removing them leaves exactly the rest.
    #[test]
    fn registry_tracks_each_id_once(
        ids in prop::collection::vec(0u8..16, 0..64),
        removed in prop::collection::vec(0u8..16, 0..16),
    ) {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        for id in &ids {
            registry.on_observed(
                &EntityId::new(format!("c{id}")),
                CHICKEN_TYPE_ID,
                DimensionId::Overworld,
                SimTick::ZERO,
            );
        }
        for id in &removed {
            registry.on_removed(&EntityId::new(format!("c{id}")));
        }

        let mut expected: Vec<u8> = Vec::new();
        for id in &ids {
            if !expected.contains(id) && !removed.contains(id) {
                expected.push(*id);
            }
        }
        let expected: Vec<EntityId> = expected
            .into_iter()
            .map(|id| EntityId::new(format!("c{id}")))
            .collect();
        prop_assert_eq!(registry.entries(), expected);
    }
}
