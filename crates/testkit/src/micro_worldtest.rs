//! Micro-worldtest harness for deterministic, tick-based tests.
//!
//! A micro-worldtest steps a tiny simulation for a fixed number of ticks and
//! captures selected state after each step. Tests assert on the returned
//! frames directly.

use featherlay_core::SimTick;
use serde::Serialize;

/// Configuration for a micro-worldtest.
#[derive(Debug, Clone)]
pub struct MicroWorldtestConfig {
    /// Human-readable name, carried into the report.
    pub name: String,
    /// Number of ticks to step (the report also holds the initial frame).
    pub ticks: u64,
}

impl MicroWorldtestConfig {
    /// Config stepping `ticks` times.
    pub fn new(name: impl Into<String>, ticks: u64) -> Self {
        Self {
            name: name.into(),
            ticks,
        }
    }
}

/// Single frame captured at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroWorldtestFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Captured state.
    pub snapshot: S,
}

/// Frames captured by one run.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestReport<S> {
    /// Test name.
    pub name: String,
    /// Frames, starting with the initial state at tick 0.
    pub frames: Vec<MicroWorldtestFrame<S>>,
}

impl<S> MicroWorldtestReport<S> {
    /// Frame captured at `tick`.
    pub fn at(&self, tick: u64) -> Option<&S> {
        self.frames
            .iter()
            .find(|f| f.tick == tick)
            .map(|f| &f.snapshot)
    }

    /// Last frame.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|f| &f.snapshot)
    }
}

/// Run a micro-worldtest.
///
/// Captures the initial snapshot at tick 0, then steps `config.ticks` times.
/// `step` receives the tick being simulated; the snapshot taken after it is
/// labelled with the following tick, so the report holds `ticks + 1` frames.
pub fn run_micro_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: MicroWorldtestConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> MicroWorldtestReport<Snapshot>
where
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(MicroWorldtestFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(MicroWorldtestFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    MicroWorldtestReport {
        name: config.name,
        frames,
    }
}
