//! In-memory engine used by worldtests and the headless host.

use featherlay_core::{
    DimensionId, EntityId, ItemStack, PlayerId, PropertyMap, PropertyValue, RegistryKey, SimTick,
};
use featherlay_world::{Engine, EngineError, Health, Variant, CHICKEN_TYPE_ID};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Engine call that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// [`Engine::produce_item`].
    ProduceItem,
    /// [`Engine::produce_effect`].
    ProduceEffect,
    /// [`Engine::produce_sound`].
    ProduceSound,
    /// [`Engine::set_property`].
    SetProperty,
    /// [`Engine::set_held_item`].
    SetHeldItem,
}

/// One simulated entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeEntity {
    /// Entity type id.
    pub type_id: String,
    /// Dimension the entity lives in.
    pub dimension: DimensionId,
    /// Raw variant component.
    pub variant: Option<i32>,
    /// Baby life-stage flag.
    pub baby: bool,
    /// Health component.
    pub health: Option<Health>,
    /// Dynamic properties.
    pub properties: PropertyMap,
    /// Whether the surrounding chunk is loaded.
    pub loaded: bool,
}

impl FakeEntity {
    /// Adult resource chicken of `variant` with full health.
    pub fn chicken(variant: Variant) -> Self {
        Self {
            type_id: CHICKEN_TYPE_ID.to_string(),
            dimension: DimensionId::Overworld,
            variant: Some(variant.component_value()),
            baby: false,
            health: Some(Health {
                current: 4.0,
                max: 4.0,
            }),
            properties: PropertyMap::new(),
            loaded: true,
        }
    }

    /// Entity of an arbitrary type with no components.
    pub fn other(type_id: &str) -> Self {
        Self {
            type_id: type_id.to_string(),
            dimension: DimensionId::Overworld,
            variant: None,
            baby: false,
            health: None,
            properties: PropertyMap::new(),
            loaded: true,
        }
    }

    /// Mark as a baby.
    pub fn baby(mut self) -> Self {
        self.baby = true;
        self
    }

    /// Override the raw variant component.
    pub fn with_raw_variant(mut self, raw: Option<i32>) -> Self {
        self.variant = raw;
        self
    }

    /// Override health.
    pub fn with_health(mut self, current: f32, max: f32) -> Self {
        self.health = Some(Health { current, max });
        self
    }

    /// Move to another dimension.
    pub fn in_dimension(mut self, dimension: DimensionId) -> Self {
        self.dimension = dimension;
        self
    }

    /// Preset a property.
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value.into());
        self
    }
}

/// An item produced into the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    /// Tick of production.
    pub tick: SimTick,
    /// Producing entity.
    pub entity: EntityId,
    /// Produced item.
    pub item: RegistryKey,
    /// Stack size.
    pub quantity: u32,
}

/// In-memory [`Engine`] with controllable tick and failure injection.
#[derive(Debug, Default)]
pub struct FakeWorld {
    tick: SimTick,
    entities: BTreeMap<EntityId, FakeEntity>,
    spawn_order: Vec<EntityId>,
    held: HashMap<PlayerId, Option<ItemStack>>,
    productions: Vec<Production>,
    effects: Vec<(EntityId, String)>,
    sounds: Vec<(EntityId, String)>,
    faults: HashMap<Fault, Option<u32>>,
}

impl FakeWorld {
    /// Empty world at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tick.
    pub fn set_tick(&mut self, tick: SimTick) {
        self.tick = tick;
    }

    /// Advance the current tick.
    pub fn advance(&mut self, ticks: u64) -> SimTick {
        self.tick = self.tick.advance(ticks);
        self.tick
    }

    /// Add an entity. Replaces any entity already using `id`.
    pub fn spawn(&mut self, id: impl Into<EntityId>, entity: FakeEntity) -> EntityId {
        let id = id.into();
        if self.entities.insert(id.clone(), entity).is_none() {
            self.spawn_order.push(id.clone());
        }
        id
    }

    /// Remove an entity. Returns it when it existed.
    pub fn despawn(&mut self, id: &EntityId) -> Option<FakeEntity> {
        self.spawn_order.retain(|e| e != id);
        self.entities.remove(id)
    }

    /// Entity by id.
    pub fn entity(&self, id: &EntityId) -> Option<&FakeEntity> {
        self.entities.get(id)
    }

    /// Mutable entity by id.
    pub fn entity_mut(&mut self, id: &EntityId) -> Option<&mut FakeEntity> {
        self.entities.get_mut(id)
    }

    /// Ids in spawn order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.spawn_order.clone()
    }

    /// Stored property value.
    pub fn property(&self, id: &EntityId, key: &str) -> Option<&PropertyValue> {
        self.entities.get(id).and_then(|e| e.properties.get(key))
    }

    /// Stored property as an integer.
    pub fn int_property(&self, id: &EntityId, key: &str) -> Option<i64> {
        self.property(id, key).and_then(PropertyValue::as_int)
    }

    /// Put a stack in a player's hand.
    pub fn give(&mut self, player: impl Into<PlayerId>, stack: Option<ItemStack>) -> PlayerId {
        let player = player.into();
        self.held.insert(player.clone(), stack);
        player
    }

    /// Stack currently in a player's hand.
    pub fn held(&self, player: &PlayerId) -> Option<&ItemStack> {
        self.held.get(player).and_then(Option::as_ref)
    }

    /// Items produced so far.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Take the productions recorded since the last drain.
    pub fn drain_productions(&mut self) -> Vec<Production> {
        std::mem::take(&mut self.productions)
    }

    /// Effects produced so far.
    pub fn effects(&self) -> &[(EntityId, String)] {
        &self.effects
    }

    /// Sounds produced so far.
    pub fn sounds(&self) -> &[(EntityId, String)] {
        &self.sounds
    }

    /// Fail the next `count` calls of `fault`.
    pub fn fail_next(&mut self, fault: Fault, count: u32) {
        self.faults.insert(fault, Some(count));
    }

    /// Fail every call of `fault` until cleared.
    pub fn fail_always(&mut self, fault: Fault) {
        self.faults.insert(fault, None);
    }

    /// Stop injecting `fault`.
    pub fn clear_fault(&mut self, fault: Fault) {
        self.faults.remove(&fault);
    }

    fn inject(&mut self, fault: Fault) -> Result<(), EngineError> {
        let fire = match self.faults.get_mut(&fault) {
            None => false,
            Some(None) => true,
            Some(Some(0)) => false,
            Some(Some(remaining)) => {
                *remaining -= 1;
                true
            }
        };
        if fire {
            tracing::trace!(?fault, tick = self.tick.0, "Injecting engine fault");
            Err(EngineError::Rejected(format!("injected {fault:?} fault")))
        } else {
            Ok(())
        }
    }

    fn live(&self, id: &EntityId) -> Result<&FakeEntity, EngineError> {
        let entity = self
            .entities
            .get(id)
            .ok_or_else(|| EngineError::EntityNotFound(id.clone()))?;
        if !entity.loaded {
            return Err(EngineError::ChunkNotLoaded(id.clone()));
        }
        Ok(entity)
    }
}

impl Engine for FakeWorld {
    fn current_tick(&self) -> SimTick {
        self.tick
    }

    fn get_property(&self, entity: &EntityId, key: &str) -> Option<PropertyValue> {
        self.property(entity, key).cloned()
    }

    fn set_property(
        &mut self,
        entity: &EntityId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), EngineError> {
        self.inject(Fault::SetProperty)?;
        let target = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| EngineError::EntityNotFound(entity.clone()))?;
        target.properties.insert(key, value);
        Ok(())
    }

    fn query_entities_by_type(&self, dimension: DimensionId, type_id: &str) -> Vec<EntityId> {
        self.spawn_order
            .iter()
            .filter(|id| {
                self.entities
                    .get(*id)
                    .is_some_and(|e| e.dimension == dimension && e.type_id == type_id)
            })
            .cloned()
            .collect()
    }

    fn is_valid(&self, entity: &EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    fn is_baby(&self, entity: &EntityId) -> bool {
        self.entities.get(entity).is_some_and(|e| e.baby)
    }

    fn variant(&self, entity: &EntityId) -> Option<i32> {
        self.entities.get(entity).and_then(|e| e.variant)
    }

    fn health(&self, entity: &EntityId) -> Option<Health> {
        self.entities.get(entity).and_then(|e| e.health)
    }

    fn set_health(&mut self, entity: &EntityId, current: f32) -> Result<(), EngineError> {
        let target = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| EngineError::EntityNotFound(entity.clone()))?;
        match target.health.as_mut() {
            Some(health) => {
                health.current = current.clamp(0.0, health.max);
                Ok(())
            }
            None => Err(EngineError::Rejected(format!("{entity} has no health component"))),
        }
    }

    fn produce_item(
        &mut self,
        entity: &EntityId,
        item: &RegistryKey,
        quantity: u32,
    ) -> Result<(), EngineError> {
        self.live(entity)?;
        self.inject(Fault::ProduceItem)?;
        self.productions.push(Production {
            tick: self.tick,
            entity: entity.clone(),
            item: item.clone(),
            quantity,
        });
        Ok(())
    }

    fn produce_effect(&mut self, entity: &EntityId, effect_id: &str) -> Result<(), EngineError> {
        self.live(entity)?;
        self.inject(Fault::ProduceEffect)?;
        self.effects.push((entity.clone(), effect_id.to_string()));
        Ok(())
    }

    fn produce_sound(&mut self, entity: &EntityId, sound_id: &str) -> Result<(), EngineError> {
        self.live(entity)?;
        self.inject(Fault::ProduceSound)?;
        self.sounds.push((entity.clone(), sound_id.to_string()));
        Ok(())
    }

    fn set_held_item(
        &mut self,
        player: &PlayerId,
        stack: Option<ItemStack>,
    ) -> Result<(), EngineError> {
        self.inject(Fault::SetHeldItem)?;
        self.held.insert(player.clone(), stack);
        Ok(())
    }
}
