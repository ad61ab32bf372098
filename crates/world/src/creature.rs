//! Per-creature state stored in dynamic properties.
//!
//! A [`CreatureState`] is a snapshot rebuilt from the engine on every access.
//! Setters write through to the engine immediately; the snapshot is only
//! valid for the operation that loaded it.

use crate::engine::{Engine, EngineError, Health};
use crate::error::LayingError;
use crate::variant::Variant;
use featherlay_core::{EntityId, PropertyValue, SimTick};

/// Property holding the absolute tick of the next laying attempt.
pub const PROP_NEXT_LAY_DEADLINE: &str = "featherlay:next_lay_deadline";
/// Property holding consecutive failed production attempts.
pub const PROP_RETRY_COUNT: &str = "featherlay:retry_count";
/// Property holding saturation (0-100).
pub const PROP_SATURATION: &str = "featherlay:saturation";

/// Persisted value meaning "timer not yet initialized".
pub const DEADLINE_SENTINEL: i64 = -1;

/// Upper bound of the saturation scale.
pub const MAX_SATURATION: u8 = 100;

/// Next laying deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Not yet scheduled. Persisted as [`DEADLINE_SENTINEL`].
    Uninitialized,
    /// Due at or after this tick.
    At(SimTick),
}

impl Deadline {
    /// Decode a persisted value. Absent, non-integer and negative values all
    /// read as uninitialized.
    pub fn from_property(value: Option<PropertyValue>) -> Self {
        match value.as_ref().and_then(PropertyValue::as_int) {
            Some(tick) if tick >= 0 => Deadline::At(SimTick(tick as u64)),
            _ => Deadline::Uninitialized,
        }
    }

    /// Encode for persistence.
    pub fn to_property(self) -> PropertyValue {
        match self {
            Deadline::Uninitialized => PropertyValue::Int(DEADLINE_SENTINEL),
            Deadline::At(tick) => PropertyValue::Int(i64::try_from(tick.0).unwrap_or(i64::MAX)),
        }
    }

    /// Whether the deadline has passed at `now`.
    pub fn is_due(self, now: SimTick) -> bool {
        matches!(self, Deadline::At(tick) if now >= tick)
    }
}

/// Snapshot of one creature's state.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureState {
    /// Entity id.
    pub id: EntityId,
    /// Resolved variant.
    pub variant: Variant,
    /// Whether the creature is a baby.
    pub is_baby: bool,
    /// Saturation, 0-100.
    pub saturation: u8,
    /// Next laying deadline.
    pub next_lay_deadline: Deadline,
    /// Consecutive failed production attempts.
    pub retry_count: u32,
    /// Health, when the entity has a health component.
    pub health: Option<Health>,
}

impl CreatureState {
    /// Rehydrate the snapshot from the engine.
    pub fn load<E: Engine + ?Sized>(engine: &E, id: &EntityId) -> Result<Self, LayingError> {
        if !engine.is_valid(id) {
            return Err(LayingError::StaleEntity(id.clone()));
        }
        let raw = engine.variant(id);
        let variant = raw
            .and_then(Variant::from_component)
            .ok_or_else(|| LayingError::UnknownVariant {
                entity: id.clone(),
                raw,
            })?;

        Ok(Self {
            id: id.clone(),
            variant,
            is_baby: engine.is_baby(id),
            saturation: read_int(engine, id, PROP_SATURATION)
                .map(|v| v.clamp(0, MAX_SATURATION as i64) as u8)
                .unwrap_or(0),
            next_lay_deadline: Deadline::from_property(engine.get_property(id, PROP_NEXT_LAY_DEADLINE)),
            retry_count: read_int(engine, id, PROP_RETRY_COUNT)
                .map(|v| v.clamp(0, u32::MAX as i64) as u32)
                .unwrap_or(0),
            health: engine.health(id),
        })
    }

    /// Persist a new deadline.
    pub fn set_deadline<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        deadline: Deadline,
    ) -> Result<(), EngineError> {
        engine.set_property(&self.id, PROP_NEXT_LAY_DEADLINE, deadline.to_property())?;
        self.next_lay_deadline = deadline;
        Ok(())
    }

    /// Persist a new retry count.
    pub fn set_retry_count<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        retry_count: u32,
    ) -> Result<(), EngineError> {
        engine.set_property(&self.id, PROP_RETRY_COUNT, PropertyValue::Int(retry_count as i64))?;
        self.retry_count = retry_count;
        Ok(())
    }

    /// Persist a new saturation, clamped to the 0-100 scale.
    pub fn set_saturation<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        saturation: u8,
    ) -> Result<(), EngineError> {
        let saturation = saturation.min(MAX_SATURATION);
        engine.set_property(&self.id, PROP_SATURATION, PropertyValue::Int(saturation as i64))?;
        self.saturation = saturation;
        Ok(())
    }

    /// Heal by `amount`, capped at max health. Returns the amount actually
    /// healed; zero when uninjured or without a health component.
    pub fn heal<E: Engine + ?Sized>(&mut self, engine: &mut E, amount: f32) -> Result<f32, EngineError> {
        let Some(health) = self.health.filter(Health::is_injured) else {
            return Ok(0.0);
        };
        let healed = health.healed(amount);
        engine.set_health(&self.id, healed)?;
        self.health = Some(Health {
            current: healed,
            ..health
        });
        Ok(healed - health.current)
    }
}

fn read_int<E: Engine + ?Sized>(engine: &E, id: &EntityId, key: &str) -> Option<i64> {
    engine.get_property(id, key).as_ref().and_then(PropertyValue::as_int)
}

/// Make sure a freshly observed creature carries an explicit sentinel
/// deadline. Returns `true` when the property was written.
pub fn ensure_deadline_property<E: Engine + ?Sized>(
    engine: &mut E,
    id: &EntityId,
) -> Result<bool, EngineError> {
    let existing = engine.get_property(id, PROP_NEXT_LAY_DEADLINE);
    if existing.as_ref().and_then(PropertyValue::as_int).is_some() {
        return Ok(false);
    }
    engine.set_property(id, PROP_NEXT_LAY_DEADLINE, Deadline::Uninitialized.to_property())?;
    Ok(true)
}
