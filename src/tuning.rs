//! Data-driven game balance
//!
//! Every number the simulation uses lives here. Each section is
//! `#[serde(default)]`, so a tuning file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Playfield (canvas) dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTuning {
    pub width: f32,
    pub height: f32,
    /// Height of the ground band at the bottom of the playfield
    pub ground_height: f32,
}

impl Default for PlayfieldTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            ground_height: 60.0,
        }
    }
}

/// Fraction of the bird sprite trimmed from each side to form its hitbox
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxInset {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for HitboxInset {
    fn default() -> Self {
        // Matches the visible body of the bird sprite
        Self {
            left: 1.0 / 3.0,
            right: 1.0 - 1.0 / 1.2,
            top: 0.25,
            bottom: 1.0 - 1.0 / 1.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Square sprite edge length
    pub size: f32,
    /// Added to velocity every tick
    pub gravity: f32,
    /// Velocity set by a flap (negative is up)
    pub jump_impulse: f32,
    pub hitbox: HitboxInset,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            spawn_x: 50.0,
            spawn_y: 200.0,
            size: 48.0,
            gravity: 0.2,
            jump_impulse: -4.5,
            hitbox: HitboxInset::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeTuning {
    pub width: f32,
    /// Height of the passable gap
    pub gap: f32,
    /// Minimum distance between the gap and the top/bottom of the playfield
    pub margin: f32,
    /// Spawn interval at level 1
    pub base_interval_ms: f64,
    /// Hitbox inset from each vertical pipe edge
    pub horizontal_padding: f32,
    /// Hitbox inset from the gap edges and playfield edges
    pub vertical_padding: f32,
}

impl Default for PipeTuning {
    fn default() -> Self {
        Self {
            width: 60.0,
            gap: 150.0,
            margin: 50.0,
            base_interval_ms: 2000.0,
            horizontal_padding: 8.0,
            vertical_padding: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Level used by a fresh session and by restart
    pub starting_level: u32,
    /// Level score that completes a level
    pub points_per_level: u32,
    /// Level score that summons the level's boss
    pub boss_threshold: u32,
    /// Scroll speed (pixels per tick) at level 1
    pub base_speed: f32,
    /// Fractional speed increase per level
    pub speed_growth: f32,
    /// Fractional spawn-rate increase per level
    pub spacing_growth: f64,
    /// Duration of the level-complete flash
    pub flash_frames: u32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            starting_level: 1,
            points_per_level: 10,
            boss_threshold: 5,
            base_speed: 1.8,
            speed_growth: 0.5,
            spacing_growth: 0.05,
            flash_frames: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Entrance progress added per tick
    pub entrance_step: f32,
    /// Distance of the rest position from the right edge
    pub rest_offset: f32,
    /// How far off-screen entrances start
    pub spawn_offset: f32,
    /// Fraction of boss speed used for the leftward drift
    pub drift_factor: f32,
    /// Fractional boss speed increase per level
    pub speed_growth: f32,
    /// Distance from the right edge a drifting boss wraps back to
    pub wrap_margin: f32,
    pub sway_amplitude: f32,
    pub sway_amplitude_per_level: f32,
    pub sway_time_growth: f32,
    /// Sway is clamped to this fraction of the height around the center
    pub vertical_band: f32,
    pub min_shot_interval_ms: f64,
    /// Per-tick firing probability at level 1
    pub fire_chance: f32,
    pub fire_chance_growth: f32,
    /// Projectile speed (pixels per tick) at level 1
    pub projectile_speed: f32,
    pub projectile_speed_growth: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            entrance_step: 0.02,
            rest_offset: 100.0,
            spawn_offset: 50.0,
            drift_factor: 0.2,
            speed_growth: 0.03,
            wrap_margin: 50.0,
            sway_amplitude: 30.0,
            sway_amplitude_per_level: 2.0,
            sway_time_growth: 0.05,
            vertical_band: 0.3,
            min_shot_interval_ms: 3000.0,
            fire_chance: 0.003,
            fire_chance_growth: 0.05,
            projectile_speed: 1.5,
            projectile_speed_growth: 0.08,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: PlayfieldTuning,
    pub bird: BirdTuning,
    pub pipes: PipeTuning,
    pub levels: LevelTuning,
    pub boss: BossTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let field = &self.playfield;
        if !(field.width > 0.0 && field.height > 0.0) {
            return Err(TuningError::invalid(
                "playfield",
                format!("dimensions must be positive, got {}x{}", field.width, field.height),
            ));
        }
        if !(0.0..field.height).contains(&field.ground_height) {
            return Err(TuningError::invalid(
                "playfield.ground_height",
                "must be within the playfield height",
            ));
        }

        let bird = &self.bird;
        if !(bird.size > 0.0 && bird.size < field.height - field.ground_height) {
            return Err(TuningError::invalid(
                "bird.size",
                "must be positive and fit above the ground band",
            ));
        }
        if !bird.gravity.is_finite() || !bird.jump_impulse.is_finite() {
            return Err(TuningError::invalid(
                "bird",
                "gravity and jump_impulse must be finite",
            ));
        }
        let inset = bird.hitbox;
        if inset.left + inset.right >= 1.0 || inset.top + inset.bottom >= 1.0 {
            return Err(TuningError::invalid(
                "bird.hitbox",
                "opposite insets must leave a non-empty hitbox",
            ));
        }

        let pipes = &self.pipes;
        if !(pipes.width > 0.0 && pipes.gap > 0.0 && pipes.margin >= 0.0) {
            return Err(TuningError::invalid(
                "pipes",
                "width and gap must be positive, margin non-negative",
            ));
        }
        if pipes.gap + 2.0 * pipes.margin >= field.height {
            return Err(TuningError::invalid(
                "pipes.gap",
                format!(
                    "gap {} plus margins {} must be less than playfield height {}",
                    pipes.gap,
                    2.0 * pipes.margin,
                    field.height
                ),
            ));
        }
        if !(pipes.base_interval_ms > 0.0) {
            return Err(TuningError::invalid(
                "pipes.base_interval_ms",
                "must be positive",
            ));
        }

        let levels = &self.levels;
        if levels.starting_level == 0 {
            return Err(TuningError::invalid(
                "levels.starting_level",
                "levels are numbered from 1",
            ));
        }
        if levels.points_per_level == 0 {
            return Err(TuningError::invalid(
                "levels.points_per_level",
                "must be at least 1",
            ));
        }
        if levels.boss_threshold > levels.points_per_level {
            return Err(TuningError::invalid(
                "levels.boss_threshold",
                "must not exceed points_per_level",
            ));
        }
        if !(levels.base_speed > 0.0) || levels.speed_growth < 0.0 || levels.spacing_growth < 0.0 {
            return Err(TuningError::invalid(
                "levels",
                "base_speed must be positive and growth rates non-negative",
            ));
        }

        let boss = &self.boss;
        if !(boss.entrance_step > 0.0) {
            return Err(TuningError::invalid(
                "boss.entrance_step",
                "must be positive or the entrance never finishes",
            ));
        }
        if !(0.0..=0.5).contains(&boss.vertical_band) {
            return Err(TuningError::invalid(
                "boss.vertical_band",
                "must be within [0, 0.5]",
            ));
        }
        if boss.min_shot_interval_ms < 0.0 || boss.fire_chance < 0.0 {
            return Err(TuningError::invalid(
                "boss",
                "shot interval and fire chance must be non-negative",
            ));
        }

        Ok(())
    }
}
