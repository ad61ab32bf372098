#![warn(missing_docs)]
//! Host-facing add-on surface.
//!
//! The host drives an add-on through [`ScriptContext`]: lifecycle and
//! interaction notifications arrive as [`HostEvent`]s, and `on_tick` is
//! called once per engine tick.

use anyhow::{Context, Result};
use featherlay_core::{scoped_rng, DimensionId, EntityId, SimTick};
use featherlay_world::{
    ensure_deadline_property, CreatureRegistry, DropTables, Engine, FeedOutcome, FeedingConfig,
    FeedingHandler, LayingConfig, LayingScheduler, PassReport, PlayerInteraction, CHICKEN_TYPE_ID,
};
use tracing::{debug, info, warn};

/// RNG domain for laying passes.
const LAYING_RNG_DOMAIN: u64 = 0x6c61_795f_7061_7373;

/// Notification delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// An entity was created.
    EntitySpawned {
        /// Entity id.
        entity: EntityId,
        /// Entity type id.
        type_id: String,
        /// Dimension it spawned in.
        dimension: DimensionId,
    },
    /// An existing entity was loaded with its chunk.
    EntityLoaded {
        /// Entity id.
        entity: EntityId,
        /// Entity type id.
        type_id: String,
        /// Dimension it was loaded in.
        dimension: DimensionId,
    },
    /// An entity is about to be removed.
    EntityRemoving {
        /// Entity id.
        entity: EntityId,
    },
    /// A player used an item on an entity.
    PlayerInteract(PlayerInteraction),
}

/// Callbacks the host invokes on an add-on.
pub trait ScriptContext<E: Engine + ?Sized> {
    /// Called once per engine tick.
    fn on_tick(&mut self, engine: &mut E) -> Result<()>;

    /// Called for each host notification.
    fn on_event(&mut self, engine: &mut E, event: &HostEvent) -> Result<()>;
}

/// The resource chicken add-on.
///
/// Owns the creature registry and hands it to the scheduler by reference on
/// each pass. Passes run only on ticks that are multiples of the configured
/// check interval.
#[derive(Debug)]
pub struct ResourceChickens {
    registry: CreatureRegistry,
    scheduler: LayingScheduler,
    feeding: FeedingHandler,
    seed: u64,
    last_pass: Option<(SimTick, PassReport)>,
}

impl ResourceChickens {
    /// Add-on with the given tuning, drop tables and session seed.
    pub fn new(laying: LayingConfig, feeding: FeedingConfig, tables: DropTables, seed: u64) -> Self {
        info!(
            seed,
            check_interval = laying.check_interval,
            phase_period = laying.phase_period,
            source = ?laying.source,
            "Resource chickens add-on ready"
        );
        Self {
            registry: CreatureRegistry::new(CHICKEN_TYPE_ID),
            scheduler: LayingScheduler::new(laying, tables),
            feeding: FeedingHandler::new(feeding, CHICKEN_TYPE_ID),
            seed,
            last_pass: None,
        }
    }

    /// Add-on with default tuning and the built-in drop tables.
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(
            LayingConfig::default(),
            FeedingConfig::default(),
            DropTables::builtin(),
            seed,
        )
    }

    /// Tracked creatures.
    pub fn registry(&self) -> &CreatureRegistry {
        &self.registry
    }

    /// Scheduler in use.
    pub fn scheduler(&self) -> &LayingScheduler {
        &self.scheduler
    }

    /// Tick and report of the most recent pass.
    pub fn last_pass(&self) -> Option<&(SimTick, PassReport)> {
        self.last_pass.as_ref()
    }

    /// Run a pass immediately regardless of cadence.
    pub fn run_pass<E: Engine + ?Sized>(&mut self, engine: &mut E) -> PassReport {
        let tick = engine.current_tick();
        let mut rng = scoped_rng(self.seed, LAYING_RNG_DOMAIN, tick);
        let report = self.scheduler.run_pass(engine, &self.registry, &mut rng);
        self.last_pass = Some((tick, report));
        report
    }

    /// Apply a feeding interaction.
    pub fn interact<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        interaction: &PlayerInteraction,
    ) -> Result<FeedOutcome> {
        self.feeding
            .handle(engine, interaction)
            .with_context(|| format!("feeding {}", interaction.target))
    }

    fn observe<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        entity: &EntityId,
        type_id: &str,
        dimension: DimensionId,
    ) -> Result<()> {
        if type_id != self.registry.tracked_type() {
            return Ok(());
        }
        self.registry
            .on_observed(entity, type_id, dimension, engine.current_tick());
        if ensure_deadline_property(engine, entity)
            .with_context(|| format!("initializing laying timer for {entity}"))?
        {
            debug!(%entity, "Initialized laying timer sentinel");
        }
        Ok(())
    }
}

impl<E: Engine + ?Sized> ScriptContext<E> for ResourceChickens {
    fn on_tick(&mut self, engine: &mut E) -> Result<()> {
        if self.scheduler.is_due_tick(engine.current_tick()) {
            self.run_pass(engine);
        }
        Ok(())
    }

    fn on_event(&mut self, engine: &mut E, event: &HostEvent) -> Result<()> {
        match event {
            HostEvent::EntitySpawned {
                entity,
                type_id,
                dimension,
            }
            | HostEvent::EntityLoaded {
                entity,
                type_id,
                dimension,
            } => self.observe(engine, entity, type_id, *dimension),
            HostEvent::EntityRemoving { entity } => {
                self.registry.on_removed(entity);
                Ok(())
            }
            HostEvent::PlayerInteract(interaction) => {
                match self.interact(engine, interaction) {
                    Ok(outcome) => debug!(target_entity = %interaction.target, ?outcome, "Interaction handled"),
                    Err(err) => warn!(target_entity = %interaction.target, "Interaction failed: {err:#}"),
                }
                Ok(())
            }
        }
    }
}
