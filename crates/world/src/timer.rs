//! Laying timers.
//!
//! Deadlines are absolute ticks. Relative countdowns decremented once per
//! check drift whenever the check cadence changes, so they are not used.

use crate::drop_table::VariantConfig;
use featherlay_core::SimTick;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Retry policy applied after a failed production attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerPolicy {
    /// Delay before the first retry, in ticks.
    pub base_backoff: u64,
    /// Retries allowed before falling back to a fresh full-range deadline.
    pub max_retries: u32,
}

impl Default for TimerPolicy {
    fn default() -> Self {
        Self {
            base_backoff: 20,
            max_retries: 3,
        }
    }
}

/// Outcome of scheduling after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    /// New absolute deadline.
    pub deadline: SimTick,
    /// Retry count to persist.
    pub retry_count: u32,
    /// Whether backoff was abandoned in favour of a fresh deadline.
    pub abandoned: bool,
}

impl TimerPolicy {
    /// Fresh deadline: `now + min + uniform(0..=max - min)`.
    pub fn next_deadline<R: Rng>(&self, config: &VariantConfig, now: SimTick, rng: &mut R) -> SimTick {
        let min = config.min_spawn_tick();
        let max = config.max_spawn_tick();
        let jitter = if max > min { rng.gen_range(0..=max - min) } else { 0 };
        now.advance(min).advance(jitter)
    }

    /// Delay for the `attempt`-th consecutive retry (1-based): `base * 2^(attempt-1)`.
    pub fn backoff(&self, attempt: u32) -> u64 {
        let shift = attempt.saturating_sub(1).min(63);
        self.base_backoff.saturating_mul(1u64 << shift)
    }

    /// Deadline after a failed attempt, given the count persisted before it.
    pub fn after_failure<R: Rng>(
        &self,
        retry_count: u32,
        config: &VariantConfig,
        now: SimTick,
        rng: &mut R,
    ) -> Retry {
        let attempt = retry_count.saturating_add(1);
        if attempt > self.max_retries {
            return Retry {
                deadline: self.next_deadline(config, now, rng),
                retry_count: 0,
                abandoned: true,
            };
        }
        Retry {
            deadline: now.advance(self.backoff(attempt)),
            retry_count: attempt,
            abandoned: false,
        }
    }
}
