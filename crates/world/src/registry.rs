//! Registry of live resource chickens.
//!
//! Kept in sync with the host's spawn, load and pre-removal notifications.
//! Both spawn and load may fire for the same entity, and removals can arrive
//! for entities never observed, so every mutation is idempotent.
//!
//! The registry is owned by the add-on and handed out by reference: `&mut`
//! to notification handlers and `&` to the laying scheduler.

use featherlay_core::{DimensionId, EntityId, SimTick};
use std::collections::{BTreeMap, HashMap};

/// Insertion-ordered set of tracked creatures.
#[derive(Debug, Clone)]
pub struct CreatureRegistry {
    tracked_type: String,
    entries: BTreeMap<u64, EntityId>,
    index: HashMap<EntityId, u64>,
    next_seq: u64,
}

impl CreatureRegistry {
    /// Registry tracking entities of `tracked_type`.
    pub fn new(tracked_type: impl Into<String>) -> Self {
        Self {
            tracked_type: tracked_type.into(),
            entries: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Type id this registry tracks.
    pub fn tracked_type(&self) -> &str {
        &self.tracked_type
    }

    /// Record an observed entity. Entities of other types are ignored; a
    /// repeated observation is a no-op. Returns `true` when inserted.
    pub fn on_observed(
        &mut self,
        id: &EntityId,
        type_id: &str,
        dimension: DimensionId,
        tick: SimTick,
    ) -> bool {
        if type_id != self.tracked_type || self.index.contains_key(id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(id.clone(), seq);
        self.entries.insert(seq, id.clone());
        tracing::debug!(entity = %id, %dimension, tick = tick.0, "Tracking creature");
        true
    }

    /// Forget an entity. Returns `true` if it was tracked.
    pub fn on_removed(&mut self, id: &EntityId) -> bool {
        match self.index.remove(id) {
            Some(seq) => {
                self.entries.remove(&seq);
                tracing::debug!(entity = %id, "Stopped tracking creature");
                true
            }
            None => false,
        }
    }

    /// Snapshot of tracked ids in insertion order. Later registry mutations do
    /// not affect a snapshot already taken.
    pub fn entries(&self) -> Vec<EntityId> {
        self.entries.values().cloned().collect()
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of tracked creatures.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drop every entry (session teardown).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::CHICKEN_TYPE_ID;

    fn observe(registry: &mut CreatureRegistry, id: &str) -> bool {
        registry.on_observed(
            &EntityId::new(id),
            CHICKEN_TYPE_ID,
            DimensionId::Overworld,
            SimTick::ZERO,
        )
    }

    #[test]
    fn observation_is_idempotent() {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        assert!(observe(&mut registry, "a"));
        assert!(!observe(&mut registry, "a"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries(), vec![EntityId::new("a")]);
    }

    #[test]
    fn other_types_are_ignored() {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        let id = EntityId::new("cow");
        assert!(!registry.on_observed(
            &id,
            "minecraft:cow",
            DimensionId::Overworld,
            SimTick::ZERO
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn removal_is_idempotent() {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        observe(&mut registry, "a");
        assert!(registry.on_removed(&EntityId::new("a")));
        assert!(!registry.on_removed(&EntityId::new("a")));
        assert!(!registry.on_removed(&EntityId::new("never-seen")));
        assert!(registry.is_empty());
    }

    #[test]
    fn entries_keep_insertion_order_across_removals() {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        for id in ["c", "a", "b"] {
            observe(&mut registry, id);
        }
        registry.on_removed(&EntityId::new("a"));
        observe(&mut registry, "a");
        let ids: Vec<_> = registry.entries().iter().map(|e| e.to_string()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_mutation() {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        observe(&mut registry, "a");
        observe(&mut registry, "b");
        let snapshot = registry.entries();
        registry.on_removed(&EntityId::new("a"));
        observe(&mut registry, "c");
        assert_eq!(snapshot, vec![EntityId::new("a"), EntityId::new("b")]);
    }

    #[test]
    fn clear_empties_registry() {
        let mut registry = CreatureRegistry::new(CHICKEN_TYPE_ID);
        observe(&mut registry, "a");
        registry.clear();
        assert!(registry.is_empty());
        assert!(observe(&mut registry, "a"));
    }
}
