//! Player feeding interactions.

use crate::creature::{CreatureState, MAX_SATURATION};
use crate::engine::{Engine, EngineError};
use crate::error::LayingError;
use featherlay_core::{EntityId, ItemStack, PlayerId, RegistryKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Feeding tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingConfig {
    /// Item accepted as feed.
    pub feed_item: RegistryKey,
    /// Saturation gained per feed.
    pub saturation_per_feed: u8,
    /// Hit points restored per feed when injured.
    pub heal_amount: f32,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            feed_item: RegistryKey::addon("chicken_feed"),
            saturation_per_feed: 25,
            heal_amount: 2.0,
        }
    }
}

/// A player used an item on an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInteraction {
    /// Interacting player.
    pub player: PlayerId,
    /// Entity interacted with.
    pub target: EntityId,
    /// Target's type id as reported with the interaction.
    pub target_type: String,
    /// Stack in the player's selected slot.
    pub held: Option<ItemStack>,
}

/// Result of a feeding interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// Target is not a tracked creature.
    NotCreature,
    /// Babies cannot be fed.
    Baby,
    /// Saturation already at the cap.
    Satiated,
    /// Player is not holding feed.
    WrongItem,
    /// Creature fed.
    Fed {
        /// Saturation after feeding.
        saturation: u8,
        /// Hit points restored.
        healed: f32,
        /// Stack left in the player's hand.
        remaining: Option<ItemStack>,
    },
}

/// Applies feeding interactions to creature state.
#[derive(Debug, Clone)]
pub struct FeedingHandler {
    config: FeedingConfig,
    creature_type: String,
}

impl FeedingHandler {
    /// Handler feeding entities of `creature_type`.
    pub fn new(config: FeedingConfig, creature_type: impl Into<String>) -> Self {
        Self {
            config,
            creature_type: creature_type.into(),
        }
    }

    /// Tuning in use.
    pub fn config(&self) -> &FeedingConfig {
        &self.config
    }

    /// Handle one interaction. Everything short of a successful feed leaves
    /// both the creature and the held stack untouched.
    pub fn handle<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
        interaction: &PlayerInteraction,
    ) -> Result<FeedOutcome, LayingError> {
        if interaction.target_type != self.creature_type {
            return Ok(FeedOutcome::NotCreature);
        }
        let mut state = CreatureState::load(&*engine, &interaction.target)?;
        if state.is_baby {
            return Ok(FeedOutcome::Baby);
        }
        if state.saturation >= MAX_SATURATION {
            return Ok(FeedOutcome::Satiated);
        }
        let Some(held) = interaction
            .held
            .clone()
            .filter(|stack| stack.is(&self.config.feed_item) && stack.count > 0)
        else {
            return Ok(FeedOutcome::WrongItem);
        };

        let remaining = held.clone().consume_one();
        engine.set_held_item(&interaction.player, remaining.clone())?;

        let saturation = state
            .saturation
            .saturating_add(self.config.saturation_per_feed)
            .min(MAX_SATURATION);
        let healed = match self.apply(engine, &mut state, saturation) {
            Ok(healed) => healed,
            Err(err) => {
                if let Err(restore) = engine.set_held_item(&interaction.player, Some(held)) {
                    warn!(player = %interaction.player, %restore, "Failed to return feed after rejected feeding");
                }
                return Err(err.into());
            }
        };

        debug!(
            entity = %interaction.target,
            player = %interaction.player,
            saturation,
            healed,
            "Creature fed"
        );
        Ok(FeedOutcome::Fed {
            saturation,
            healed,
            remaining,
        })
    }

    /// Write saturation then heal. A rejected heal restores the previous
    /// saturation.
    fn apply<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
        state: &mut CreatureState,
        saturation: u8,
    ) -> Result<f32, EngineError> {
        let previous = state.saturation;
        state.set_saturation(engine, saturation)?;
        match state.heal(engine, self.config.heal_amount) {
            Ok(healed) => Ok(healed),
            Err(err) => {
                if let Err(restore) = state.set_saturation(engine, previous) {
                    warn!(entity = %state.id, %restore, "Failed to restore saturation");
                }
                Err(err)
            }
        }
    }
}
