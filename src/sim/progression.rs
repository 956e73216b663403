//! Level progression and scoring
//!
//! Level score resets every level; total score survives level changes and is
//! only cleared by a full restart.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current level, scores, and the difficulty derived from the level number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Current level (1-based)
    pub level: u32,
    /// Points scored in the current level
    pub level_score: u32,
    /// Points scored since the last restart
    pub total_score: u32,
    /// Pipe scroll speed in pixels per tick
    pub speed: f32,
    /// Time between pipe spawns
    pub spawn_interval_ms: f64,
    /// Whether this level's boss has been summoned
    pub boss_has_appeared: bool,
}

impl Progression {
    /// Fresh progression at `level` with zeroed scores
    pub fn new(level: u32, tuning: &Tuning) -> Self {
        let mut progress = Self {
            level: 1,
            level_score: 0,
            total_score: 0,
            speed: tuning.levels.base_speed,
            spawn_interval_ms: tuning.pipes.base_interval_ms,
            boss_has_appeared: false,
        };
        progress.enter_level(level, tuning);
        progress
    }

    /// Move to `level`, keeping the total score
    pub fn enter_level(&mut self, level: u32, tuning: &Tuning) {
        let level = level.max(1);
        self.level = level;
        self.level_score = 0;
        self.boss_has_appeared = false;
        self.speed = speed_for_level(level, tuning);
        self.spawn_interval_ms = spawn_interval_for_level(level, tuning);
    }

    /// Count one passed pipe toward both scores
    pub fn record_point(&mut self) {
        self.level_score += 1;
        self.total_score += 1;
    }

    /// Level score has reached the level's target
    pub fn is_level_complete(&self, tuning: &Tuning) -> bool {
        self.level_score >= tuning.levels.points_per_level
    }

    /// The boss threshold is reached and no boss has appeared yet this level
    pub fn boss_due(&self, tuning: &Tuning) -> bool {
        !self.boss_has_appeared && self.level_score >= tuning.levels.boss_threshold
    }

    /// Score shown on the game-over screen: total score weighted by the level reached
    pub fn final_score(&self) -> u32 {
        self.level.saturating_mul(self.total_score)
    }

    /// Pipes still needed to finish the level, given how many are in flight unscored
    pub fn pipes_needed(&self, unscored_in_flight: usize, tuning: &Tuning) -> usize {
        let resolved = unscored_in_flight + self.level_score as usize;
        (tuning.levels.points_per_level as usize).saturating_sub(resolved)
    }

    /// Multiplier applied to level-scaled boss values: `1 + (level - 1) * growth`
    #[inline]
    pub fn growth(&self, per_level: f32) -> f32 {
        1.0 + (self.level - 1) as f32 * per_level
    }
}

/// `base_speed * (1 + (level - 1) * speed_growth)`
pub fn speed_for_level(level: u32, tuning: &Tuning) -> f32 {
    let levels = &tuning.levels;
    levels.base_speed * (1.0 + level.saturating_sub(1) as f32 * levels.speed_growth)
}

/// `base_interval / (1 + (level - 1) * spacing_growth)`; pipes get denser with level
pub fn spawn_interval_for_level(level: u32, tuning: &Tuning) -> f64 {
    let growth = 1.0 + level.saturating_sub(1) as f64 * tuning.levels.spacing_growth;
    tuning.pipes.base_interval_ms / growth
}
