use crate::config::AddonConfig;
use anyhow::{Context, Result};
use featherlay_core::{DimensionId, EntityId, ItemStack, SimTick};
use featherlay_scripting::{HostEvent, ResourceChickens, ScriptContext};
use featherlay_testkit::{EventRecord, FakeEntity, FakeWorld, JsonlSink};
use featherlay_world::{
    CandidateSource, DropTables, Engine, FeedOutcome, PlayerInteraction, Variant, CHICKEN_TYPE_ID,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Every this many chickens, one is spawned as a baby.
const BABY_EVERY: usize = 7;

pub struct HeadlessConfig {
    pub addon: AddonConfig,
    pub tables: DropTables,
    pub chickens: usize,
    pub ticks: u64,
    pub live_query: bool,
    pub record: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub chickens: usize,
    pub passes: u64,
    pub produced: usize,
    pub failed: usize,
    pub fed: usize,
    pub items: BTreeMap<String, u64>,
}

/// Spawn a flock in an in-memory world and run the add-on for `ticks` ticks.
pub fn run(cfg: HeadlessConfig) -> Result<SessionSummary> {
    let mut laying = cfg.addon.laying.clone();
    if cfg.live_query {
        laying.source = CandidateSource::LiveQuery {
            dimension: DimensionId::Overworld,
        };
    }
    let mut addon = ResourceChickens::new(
        laying,
        cfg.addon.feeding.clone(),
        cfg.tables,
        cfg.addon.seed,
    );
    let mut sink = cfg
        .record
        .as_ref()
        .map(JsonlSink::create)
        .transpose()
        .context("Failed to open event record")?;

    let mut world = FakeWorld::new();
    let mut summary = SessionSummary {
        ticks: cfg.ticks,
        chickens: cfg.chickens,
        ..SessionSummary::default()
    };

    for n in 0..cfg.chickens {
        let variant = Variant::ALL[n % Variant::ALL.len()];
        let mut entity = FakeEntity::chicken(variant).with_health(2.0, 4.0);
        if n % BABY_EVERY == BABY_EVERY - 1 {
            entity = entity.baby();
        }
        let id = world.spawn(EntityId::new(format!("chicken-{n}")), entity);
        addon.on_event(
            &mut world,
            &HostEvent::EntitySpawned {
                entity: id,
                type_id: CHICKEN_TYPE_ID.to_string(),
                dimension: DimensionId::Overworld,
            },
        )?;
    }
    info!(chickens = cfg.chickens, ticks = cfg.ticks, "Session started");

    // One farmer walks the flock once, feeding each chicken.
    let feed = ItemStack::new(cfg.addon.feeding.feed_item.clone(), cfg.chickens as u32 + 1);
    let farmer = world.give("farmer", Some(feed));
    for id in world.entity_ids() {
        let interaction = PlayerInteraction {
            player: farmer.clone(),
            target: id.clone(),
            target_type: CHICKEN_TYPE_ID.to_string(),
            held: world.held(&farmer).cloned(),
        };
        if let FeedOutcome::Fed { .. } = addon.interact(&mut world, &interaction)? {
            summary.fed += 1;
            record(&mut sink, SimTick::ZERO, "feed", &id, serde_json::json!({}))?;
        }
    }

    for t in 0..cfg.ticks {
        world.set_tick(SimTick(t));
        addon.on_tick(&mut world)?;
        if let Some((tick, report)) = addon.last_pass().filter(|(tick, _)| tick.0 == t) {
            summary.passes += 1;
            summary.failed += report.failed;
            if report.failed > 0 {
                record(
                    &mut sink,
                    *tick,
                    "lay_failed",
                    &EntityId::new("*"),
                    serde_json::json!({ "count": report.failed }),
                )?;
            }
        }
        for production in world.drain_productions() {
            summary.produced += 1;
            *summary.items.entry(production.item.to_string()).or_default() +=
                u64::from(production.quantity);
            record(
                &mut sink,
                production.tick,
                "lay",
                &production.entity,
                serde_json::json!({
                    "item": production.item.to_string(),
                    "quantity": production.quantity,
                }),
            )?;
        }
    }

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    info!(
        produced = summary.produced,
        failed = summary.failed,
        at = world.current_tick().0,
        "Session finished"
    );
    Ok(summary)
}

fn record(
    sink: &mut Option<JsonlSink>,
    tick: SimTick,
    kind: &str,
    entity: &EntityId,
    payload: serde_json::Value,
) -> Result<()> {
    if let Some(sink) = sink.as_mut() {
        sink.write(&EventRecord {
            tick,
            kind,
            entity: entity.as_str(),
            payload,
        })?;
    }
    Ok(())
}
