//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as a parameter, never from a global clock
//! - Randomness comes through an injected `RandomSource` only
//! - Stable iteration order (pipes and projectiles oldest first)
//! - No rendering or platform dependencies

pub mod boss;
pub mod geometry;
pub mod obstacles;
pub mod progression;
pub mod rng;
pub mod state;
pub mod tick;

pub use boss::{BossStep, spawn_boss, update_boss};
pub use geometry::{Aabb, boxes_overlap, circles_overlap};
pub use obstacles::{PipeStep, maybe_spawn_pipe, pipe_collides, random_gap_start};
pub use progression::Progression;
pub use rng::{RandomSource, SeededRandom};
pub use state::{
    Bird, Boss, BossKind, BossStage, Entrance, FlashEffect, GameEvent, GameOverCause, GameState,
    Pipe, Projectile, SessionPhase,
};
pub use tick::{TickInput, autopilot_wants_flap, tick, update};
