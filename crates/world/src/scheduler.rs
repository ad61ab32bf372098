//! Resource laying scheduler.
//!
//! The host invokes [`LayingScheduler::run_pass`] every `check_interval`
//! ticks. Each pass takes a snapshot of candidate creatures, evaluates the
//! slice of them whose phase matches this invocation, and lays drops for the
//! ones whose deadline has passed.
//!
//! Nothing survives between passes except what is written to entity
//! properties, so the host is free to add, remove or edit creatures between
//! invocations.

use crate::creature::{CreatureState, Deadline};
use crate::drop_table::DropTables;
use crate::engine::Engine;
use crate::error::LayingError;
use crate::registry::CreatureRegistry;
use crate::sampler;
use crate::timer::TimerPolicy;
use featherlay_core::{DimensionId, EntityId, RegistryKey, SimTick};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Particle spawned when a drop is laid.
pub const LAY_EFFECT_ID: &str = "minecraft:crop_growth_emitter";
/// Sound played when a drop is laid.
pub const LAY_SOUND_ID: &str = "mob.chicken.plop";

/// Where a pass gets its candidate creatures from.
///
/// `Registry` is cheap (no host query) but can be one notification behind;
/// stale ids are caught by the validity check. `LiveQuery` always matches the
/// host but pays for a full entity query every pass and only sees one
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateSource {
    /// Enumerate the [`CreatureRegistry`].
    #[default]
    Registry,
    /// Ask the host for every tracked-type entity in `dimension`.
    LiveQuery {
        /// Dimension to query.
        dimension: DimensionId,
    },
}

/// Scheduler tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayingConfig {
    /// Engine ticks between scheduler invocations.
    pub check_interval: u64,
    /// Invocations a full sweep is spread over. Each creature is evaluated
    /// on one invocation out of `phase_period`.
    pub phase_period: u64,
    /// Particle spawned on a successful lay.
    pub effect_id: String,
    /// Sound played on a successful lay.
    pub sound_id: String,
    /// Candidate source.
    pub source: CandidateSource,
    /// Retry/backoff policy.
    pub timer: TimerPolicy,
}

impl Default for LayingConfig {
    fn default() -> Self {
        Self {
            check_interval: 1,
            phase_period: 10,
            effect_id: LAY_EFFECT_ID.to_string(),
            sound_id: LAY_SOUND_ID.to_string(),
            source: CandidateSource::default(),
            timer: TimerPolicy::default(),
        }
    }
}

/// What happened to one creature during a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum LayOutcome {
    /// Outside this invocation's phase slice.
    OutOfPhase,
    /// First timer scheduled.
    Initialized {
        /// Scheduled deadline.
        deadline: SimTick,
    },
    /// Deadline not reached.
    NotDue,
    /// Due but a baby; deadline reset to the sentinel.
    BabyReset,
    /// Drop laid.
    Produced {
        /// Item laid.
        item: RegistryKey,
        /// Stack size laid.
        quantity: u32,
        /// Next deadline.
        deadline: SimTick,
    },
    /// The host declined the drop.
    Failed {
        /// Retry count now persisted.
        retry_count: u32,
        /// Whether backoff was abandoned for a fresh deadline.
        abandoned: bool,
        /// Next deadline.
        deadline: SimTick,
    },
}

/// Per-pass counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Candidates in the working set.
    pub candidates: usize,
    /// Candidates skipped by phase offset.
    pub out_of_phase: usize,
    /// Timers initialized.
    pub initialized: usize,
    /// Creatures not yet due.
    pub not_due: usize,
    /// Baby creatures whose deadline was reset.
    pub baby_resets: usize,
    /// Drops laid.
    pub produced: usize,
    /// Failed production attempts.
    pub failed: usize,
    /// Creatures skipped because of an error.
    pub errors: usize,
}

impl PassReport {
    fn record(&mut self, outcome: &LayOutcome) {
        match outcome {
            LayOutcome::OutOfPhase => self.out_of_phase += 1,
            LayOutcome::Initialized { .. } => self.initialized += 1,
            LayOutcome::NotDue => self.not_due += 1,
            LayOutcome::BabyReset => self.baby_resets += 1,
            LayOutcome::Produced { .. } => self.produced += 1,
            LayOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Phase hash of an entity id: the 31-multiplier string hash over UTF-16
/// code units, taken as an absolute value.
pub fn phase_hash(id: &str) -> u64 {
    let hash = id
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
    u64::from(hash.unsigned_abs())
}

/// Drives resource laying.
#[derive(Debug, Clone)]
pub struct LayingScheduler {
    config: LayingConfig,
    tables: DropTables,
}

impl LayingScheduler {
    /// Scheduler with the given tuning and drop tables.
    pub fn new(config: LayingConfig, tables: DropTables) -> Self {
        Self { config, tables }
    }

    /// Tuning in use.
    pub fn config(&self) -> &LayingConfig {
        &self.config
    }

    /// Drop tables in use.
    pub fn tables(&self) -> &DropTables {
        &self.tables
    }

    fn check_interval(&self) -> u64 {
        self.config.check_interval.max(1)
    }

    /// Whether the host should invoke a pass on `tick`.
    pub fn is_due_tick(&self, tick: SimTick) -> bool {
        tick.0 % self.check_interval() == 0
    }

    /// Whether `id` is evaluated on the invocation at `now`.
    pub fn in_phase(&self, id: &EntityId, now: SimTick) -> bool {
        let period = self.config.phase_period.max(1);
        let invocation = now.0 / self.check_interval();
        (invocation % period + phase_hash(id.as_str()) % period) % period == 0
    }

    /// Candidate ids for this pass.
    pub fn working_set<E: Engine + ?Sized>(&self, engine: &E, registry: &CreatureRegistry) -> Vec<EntityId> {
        match self.config.source {
            CandidateSource::Registry => registry.entries(),
            CandidateSource::LiveQuery { dimension } => {
                engine.query_entities_by_type(dimension, registry.tracked_type())
            }
        }
    }

    /// Run one scheduler invocation. Errors for individual creatures are
    /// logged and counted; the pass always covers the whole working set.
    pub fn run_pass<E, R>(&self, engine: &mut E, registry: &CreatureRegistry, rng: &mut R) -> PassReport
    where
        E: Engine + ?Sized,
        R: Rng,
    {
        let now = engine.current_tick();
        let candidates = self.working_set(&*engine, registry);
        let mut report = PassReport {
            candidates: candidates.len(),
            ..PassReport::default()
        };

        for id in &candidates {
            match self.process(engine, id, now, rng) {
                Ok(outcome) => report.record(&outcome),
                Err(LayingError::StaleEntity(_)) => {
                    debug!(entity = %id, "Skipping stale creature");
                    report.errors += 1;
                }
                Err(err) => {
                    warn!(entity = %id, %err, "Failed to process creature");
                    report.errors += 1;
                }
            }
        }

        if report.produced > 0 || report.failed > 0 || report.errors > 0 {
            debug!(tick = now.0, ?report, "Laying pass complete");
        }
        report
    }

    /// Evaluate one creature at `now`.
    pub fn process<E, R>(
        &self,
        engine: &mut E,
        id: &EntityId,
        now: SimTick,
        rng: &mut R,
    ) -> Result<LayOutcome, LayingError>
    where
        E: Engine + ?Sized,
        R: Rng,
    {
        if !self.in_phase(id, now) {
            return Ok(LayOutcome::OutOfPhase);
        }

        let mut state = CreatureState::load(&*engine, id)?;
        let config = self.tables.get(state.variant);
        let timer = &self.config.timer;

        match state.next_lay_deadline {
            Deadline::Uninitialized => {
                let deadline = timer.next_deadline(config, now, rng);
                state.set_deadline(engine, Deadline::At(deadline))?;
                debug!(entity = %id, variant = %state.variant, deadline = deadline.0, "Scheduled first lay");
                return Ok(LayOutcome::Initialized { deadline });
            }
            due @ Deadline::At(_) if !due.is_due(now) => return Ok(LayOutcome::NotDue),
            Deadline::At(_) => {}
        }

        if state.is_baby {
            state.set_deadline(engine, Deadline::Uninitialized)?;
            debug!(entity = %id, "Baby creature is due; timer reset");
            return Ok(LayOutcome::BabyReset);
        }

        let entry = config.items().sample(rng);
        let quantity = sampler::roll_amount(entry, rng);

        // The next window is persisted before producing so a rejected write
        // cannot leave the creature due after it has laid.
        let deadline = timer.next_deadline(config, now, rng);
        state.set_deadline(engine, Deadline::At(deadline))?;

        match engine.produce_item(id, &entry.item, quantity) {
            Ok(()) => {
                self.play_lay_effects(engine, id);
                if state.retry_count != 0 {
                    if let Err(err) = state.set_retry_count(engine, 0) {
                        warn!(entity = %id, %err, "Failed to clear retry count after lay");
                    }
                }
                debug!(entity = %id, item = %entry.item, quantity, next = deadline.0, "Laid drop");
                Ok(LayOutcome::Produced {
                    item: entry.item.clone(),
                    quantity,
                    deadline,
                })
            }
            Err(err) => {
                let retry = timer.after_failure(state.retry_count, config, now, rng);
                state.set_retry_count(engine, retry.retry_count)?;
                state.set_deadline(engine, Deadline::At(retry.deadline))?;
                debug!(
                    entity = %id,
                    %err,
                    retry_count = retry.retry_count,
                    abandoned = retry.abandoned,
                    next = retry.deadline.0,
                    "Drop production failed"
                );
                Ok(LayOutcome::Failed {
                    retry_count: retry.retry_count,
                    abandoned: retry.abandoned,
                    deadline: retry.deadline,
                })
            }
        }
    }

    fn play_lay_effects<E: Engine + ?Sized>(&self, engine: &mut E, id: &EntityId) {
        if let Err(err) = engine.produce_effect(id, &self.config.effect_id) {
            debug!(entity = %id, %err, "Lay particle failed");
        }
        if let Err(err) = engine.produce_sound(id, &self.config.sound_id) {
            debug!(entity = %id, %err, "Lay sound failed");
        }
    }
}
