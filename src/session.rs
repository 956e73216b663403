//! Game session: the surface a presentation layer talks to
//!
//! A [`Session`] owns the [`GameState`] together with its time and random
//! sources. Input methods and [`Session::tick`] all take `&mut self`, so input
//! is always serialized with ticks; a multi-threaded driver wraps the session
//! in a single lock or funnels input through [`TickInput`].

use std::time::Instant;

use serde::Serialize;

use crate::sim::{
    BossKind, GameEvent, GameOverCause, GameState, RandomSource, SeededRandom, SessionPhase,
    TickInput,
};
use crate::tuning::Tuning;

/// Monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to; for tests and fixed-step replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Bird as seen by a renderer
#[derive(Debug, Clone, Serialize)]
pub struct BirdView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub velocity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipeView {
    pub x: f32,
    pub gap_start_y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BossView {
    pub x: f32,
    pub y: f32,
    pub kind: BossKind,
    pub size: f32,
    pub entrance_progress: f32,
    pub projectiles: Vec<ProjectileView>,
}

/// Read-only copy of everything needed to draw a frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub game_over_cause: Option<GameOverCause>,
    pub level: u32,
    pub level_score: u32,
    pub total_score: u32,
    /// Level-weighted score for the game-over screen
    pub final_score: u32,
    pub bird: BirdView,
    pub pipes: Vec<PipeView>,
    pub bosses: Vec<BossView>,
    pub flash_active: bool,
}

impl Snapshot {
    pub fn of(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            game_over_cause: state.game_over_cause,
            level: state.progress.level,
            level_score: state.progress.level_score,
            total_score: state.progress.total_score,
            final_score: state.progress.final_score(),
            bird: BirdView {
                x: state.bird.pos.x,
                y: state.bird.pos.y,
                size: state.bird.size,
                velocity: state.bird.velocity,
            },
            pipes: state
                .pipes
                .iter()
                .map(|p| PipeView {
                    x: p.x,
                    gap_start_y: p.gap_start_y,
                })
                .collect(),
            bosses: state
                .bosses
                .iter()
                .map(|b| BossView {
                    x: b.pos.x,
                    y: b.pos.y,
                    kind: b.kind,
                    size: b.size(),
                    entrance_progress: b.entrance_progress,
                    projectiles: b
                        .projectiles
                        .iter()
                        .map(|p| ProjectileView {
                            x: p.pos.x,
                            y: p.pos.y,
                            size: p.size,
                        })
                        .collect(),
                })
                .collect(),
            flash_active: state.flash.active,
        }
    }
}

/// A running game with injected time and randomness
pub struct Session<C: Clock, R: RandomSource> {
    state: GameState,
    clock: C,
    rng: R,
}

impl Session<SystemClock, SeededRandom> {
    /// Real-time session with a seeded random source
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, SystemClock::new(), SeededRandom::new(seed))
    }
}

impl<C: Clock, R: RandomSource> Session<C, R> {
    pub fn new(tuning: Tuning, clock: C, rng: R) -> Self {
        Self {
            state: GameState::new(tuning),
            clock,
            rng,
        }
    }

    /// Flap; the first flap starts the game
    pub fn flap(&mut self) {
        self.state.flap();
    }

    /// Reset to the starting level with zeroed scores
    pub fn restart(&mut self) {
        self.state.restart();
    }

    /// Continue after a completed level; ignored otherwise
    pub fn advance_level(&mut self) {
        self.state.advance_level();
    }

    /// Mark sprites as loaded (or not); flaps are ignored until ready
    pub fn set_assets_ready(&mut self, ready: bool) {
        self.state.assets_ready = ready;
    }

    /// Advance one step at the clock's current time
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        crate::sim::update(&mut self.state, now, &mut self.rng)
    }

    /// Apply queued input, then advance one step
    pub fn tick_with(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        crate::sim::tick(&mut self.state, input, now, &mut self.rng)
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Whether a driver should keep scheduling ticks
    pub fn is_running(&self) -> bool {
        matches!(
            self.state.phase,
            SessionPhase::NotStarted | SessionPhase::Playing
        ) || self.state.flash.active
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for fixtures and debugging tools
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
