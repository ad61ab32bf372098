//! Host engine capability interface.
//!
//! Everything the laying core needs from the game is expressed here. The core
//! never caches anything it reads through this trait beyond a single
//! operation: the host may create, destroy or mutate entities between any two
//! callbacks.

use featherlay_core::{
    DimensionId, EntityId, ItemStack, PlayerId, PropertyValue, RegistryKey, SimTick,
};
use thiserror::Error;

/// Errors the host reports for individual engine calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The entity no longer exists on the host.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    /// The entity's position is in a chunk the host has not loaded.
    #[error("chunk around entity {0} is not loaded")]
    ChunkNotLoaded(EntityId),
    /// The host refused the call for another reason.
    #[error("host rejected call: {0}")]
    Rejected(String),
}

/// Current and maximum health of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
}

impl Health {
    /// Whether the entity is below its maximum.
    pub fn is_injured(&self) -> bool {
        self.current < self.max
    }

    /// Health after healing by `amount`, capped at max.
    pub fn healed(&self, amount: f32) -> f32 {
        (self.current + amount).min(self.max)
    }
}

/// Capabilities the host engine exposes to the add-on.
pub trait Engine {
    /// Current simulation tick.
    fn current_tick(&self) -> SimTick;

    /// Read a dynamic property; `None` when never written.
    fn get_property(&self, entity: &EntityId, key: &str) -> Option<PropertyValue>;

    /// Write a dynamic property.
    fn set_property(
        &mut self,
        entity: &EntityId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), EngineError>;

    /// Enumerate live entities of `type_id` in a dimension, in host order.
    fn query_entities_by_type(&self, dimension: DimensionId, type_id: &str) -> Vec<EntityId>;

    /// Whether the entity still exists and can be operated on.
    fn is_valid(&self, entity: &EntityId) -> bool;

    /// Whether the entity carries the baby life-stage component.
    fn is_baby(&self, entity: &EntityId) -> bool;

    /// Raw value of the entity's variant component, if it has one.
    fn variant(&self, entity: &EntityId) -> Option<i32>;

    /// Health component, if the entity has one.
    fn health(&self, entity: &EntityId) -> Option<Health>;

    /// Set the current value of the health component.
    fn set_health(&mut self, entity: &EntityId, current: f32) -> Result<(), EngineError>;

    /// Drop `quantity` of `item` at the entity's location.
    fn produce_item(
        &mut self,
        entity: &EntityId,
        item: &RegistryKey,
        quantity: u32,
    ) -> Result<(), EngineError>;

    /// Spawn a particle effect at the entity's location.
    fn produce_effect(&mut self, entity: &EntityId, effect_id: &str) -> Result<(), EngineError>;

    /// Play a sound at the entity's location.
    fn produce_sound(&mut self, entity: &EntityId, sound_id: &str) -> Result<(), EngineError>;

    /// Replace the stack in the player's selected slot; `None` clears it.
    fn set_held_item(
        &mut self,
        player: &PlayerId,
        stack: Option<ItemStack>,
    ) -> Result<(), EngineError>;
}
