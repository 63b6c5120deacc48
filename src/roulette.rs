use rand::Rng;

use crate::board::{draw_candidate, Student};

/// Flicker budget per spin. After the budget elapses the winner is drawn
/// independently of whatever name was showing.
pub const SPIN_TICKS: u32 = 30;
/// Base flicker cadence in milliseconds.
pub const BASE_DELAY_MS: u64 = 50;
/// The last ticks of the budget slow down by this much per tick.
pub const SLOWDOWN_TAIL: u32 = 10;
pub const SLOWDOWN_STEP_MS: u64 = 30;

/// Reveal sequencer for the lucky draw. The core owns only a tick counter
/// and a pool snapshot; the host (IPC layer, UI, test harness) drives it one
/// tick at a time and is told how long to wait before the next one, so no
/// timer or scheduler leaks into the state machine.
pub struct Roulette {
    phase: Phase,
}

enum Phase {
    Idle,
    Spinning {
        pool: Vec<Student>,
        tick: u32,
        display: String,
    },
    Settled {
        winner: Student,
    },
}

#[derive(Debug, PartialEq)]
pub enum TickOutcome {
    /// Still spinning: show `display`, schedule the next tick after `delay_ms`.
    Flicker { display: String, delay_ms: u64 },
    /// Budget elapsed: the spin settled on `winner`.
    Settled { winner: Student },
}

#[derive(Debug, PartialEq, Eq)]
pub enum RouletteError {
    EmptyPool,
    AlreadySpinning,
    NotSpinning,
}

/// Delay before the flicker after tick `tick` (1-based). Constant cadence
/// through the flicker phase, then +30ms per tick over the final stretch.
pub fn delay_after_tick(tick: u32) -> u64 {
    let slowdown_from = SPIN_TICKS - SLOWDOWN_TAIL;
    let extra_steps = tick.saturating_sub(slowdown_from) as u64;
    BASE_DELAY_MS + SLOWDOWN_STEP_MS * extra_steps
}

impl Roulette {
    pub fn new() -> Self {
        Roulette { phase: Phase::Idle }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, Phase::Spinning { .. })
    }

    /// Begin a spin over a snapshot of the candidate pool. Allowed from
    /// `Idle` or `Settled`; the pool must be non-empty.
    pub fn start(&mut self, pool: Vec<Student>) -> Result<(), RouletteError> {
        if self.is_spinning() {
            return Err(RouletteError::AlreadySpinning);
        }
        if pool.is_empty() {
            return Err(RouletteError::EmptyPool);
        }
        self.phase = Phase::Spinning {
            pool,
            tick: 0,
            display: String::new(),
        };
        Ok(())
    }

    /// Advance one tick. Ticks 1..SPIN_TICKS-1 flicker a uniformly random
    /// candidate name; the final tick draws the winner with an independent
    /// uniform pick and transitions to `Settled`.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Result<TickOutcome, RouletteError> {
        let Phase::Spinning { pool, tick, display } = &mut self.phase else {
            return Err(RouletteError::NotSpinning);
        };
        *tick += 1;
        if *tick < SPIN_TICKS {
            let shown = draw_candidate(pool, rng)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            *display = shown.clone();
            return Ok(TickOutcome::Flicker {
                display: shown,
                delay_ms: delay_after_tick(*tick),
            });
        }
        // Pool is non-empty by the start() precondition.
        let winner = draw_candidate(pool, rng)
            .cloned()
            .ok_or(RouletteError::EmptyPool)?;
        self.phase = Phase::Settled {
            winner: winner.clone(),
        };
        Ok(TickOutcome::Settled { winner })
    }

    /// Snapshot of the current phase for status queries.
    pub fn status(&self) -> RouletteStatus<'_> {
        match &self.phase {
            Phase::Idle => RouletteStatus::Idle,
            Phase::Spinning { tick, display, .. } => RouletteStatus::Spinning {
                tick: *tick,
                display,
            },
            Phase::Settled { winner } => RouletteStatus::Settled { winner },
        }
    }
}

impl Default for Roulette {
    fn default() -> Self {
        Self::new()
    }
}

pub enum RouletteStatus<'a> {
    Idle,
    Spinning { tick: u32, display: &'a str },
    Settled { winner: &'a Student },
}
