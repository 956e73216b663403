//! Game state and core simulation types
//!
//! Everything a presentation layer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::progression::Progression;
use crate::consts::ENTRANCE_DONE;
use crate::tuning::{HitboxInset, Tuning};

/// Session state. Exactly one is active, so "playing" and "game over" can never both hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first flap
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended; waiting for restart
    GameOver,
    /// Level target reached; waiting for advance
    LevelComplete,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Landed on the ground band
    Ground,
    /// Left the playfield vertically
    OutOfBounds,
    /// Hit a pipe
    Pipe,
    /// Touched a boss
    Boss,
    /// Hit by a boss projectile
    Projectile,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PipeSpawned { gap_start_y: f32 },
    PointScored { level_score: u32, total_score: u32 },
    BossSpawned { kind: BossKind, entrance: Entrance },
    ProjectileFired { kind: BossKind, angle: f32 },
    GameOver { cause: GameOverCause },
    LevelComplete { level: u32 },
}

/// The player's bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner of the sprite; x never changes after spawn
    pub pos: Vec2,
    /// Vertical velocity in pixels per tick (positive is down)
    pub velocity: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Square sprite edge length
    pub size: f32,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        let bird = &tuning.bird;
        Self {
            pos: Vec2::new(bird.spawn_x, bird.spawn_y),
            velocity: 0.0,
            gravity: bird.gravity,
            jump_impulse: bird.jump_impulse,
            size: bird.size,
        }
    }

    /// One tick of constant-acceleration motion (velocity first, then position)
    pub fn integrate(&mut self) {
        self.velocity += self.gravity;
        self.pos.y += self.velocity;
    }

    pub fn flap(&mut self) {
        self.velocity = self.jump_impulse;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Collision box: the sprite bounds trimmed by fractional insets
    pub fn hitbox(&self, inset: &HitboxInset) -> Aabb {
        let (x, y) = (self.pos.x, self.pos.y);
        let s = self.size;
        Aabb::new(
            x + s * inset.left,
            x + s * (1.0 - inset.right),
            y + s * inset.top,
            y + s * (1.0 - inset.bottom),
        )
    }
}

/// A pipe pair with a passable gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_start_y: f32,
    /// Set once the bird has passed it
    pub scored: bool,
}

impl Pipe {
    /// Collision box of the upper pipe
    pub fn top_box(&self, tuning: &Tuning) -> Aabb {
        let pipes = &tuning.pipes;
        Aabb::new(self.x, self.x + pipes.width, 0.0, self.gap_start_y)
            .inset(pipes.horizontal_padding, pipes.vertical_padding)
    }

    /// Collision box of the lower pipe
    pub fn bottom_box(&self, tuning: &Tuning) -> Aabb {
        let pipes = &tuning.pipes;
        Aabb::new(
            self.x,
            self.x + pipes.width,
            self.gap_start_y + pipes.gap,
            tuning.playfield.height,
        )
        .inset(pipes.horizontal_padding, pipes.vertical_padding)
    }
}

/// Boss roster, cycled by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    Ghost,
    Demon,
    Skull,
}

impl BossKind {
    pub const ROSTER: [BossKind; 3] = [BossKind::Ghost, BossKind::Demon, BossKind::Skull];

    /// Boss for a level: `(level - 1) mod roster length`
    pub fn for_level(level: u32) -> Self {
        let index = level.saturating_sub(1) as usize % Self::ROSTER.len();
        Self::ROSTER[index]
    }

    /// Glyph diameter
    pub fn size(&self) -> f32 {
        match self {
            BossKind::Ghost => 40.0,
            BossKind::Demon => 45.0,
            BossKind::Skull => 50.0,
        }
    }

    pub fn projectile_size(&self) -> f32 {
        match self {
            BossKind::Ghost => 15.0,
            BossKind::Demon => 18.0,
            BossKind::Skull => 20.0,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            BossKind::Ghost => "👻",
            BossKind::Demon => "👿",
            BossKind::Skull => "💀",
        }
    }

    pub fn projectile_glyph(&self) -> &'static str {
        match self {
            BossKind::Ghost => "☠️",
            BossKind::Demon => "🔥",
            BossKind::Skull => "🦴",
        }
    }
}

/// Side of the playfield a boss flies in from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entrance {
    Bottom,
    Top,
    Right,
}

impl Entrance {
    pub const ALL: [Entrance; 3] = [Entrance::Bottom, Entrance::Top, Entrance::Right];

    /// Off-screen starting point
    pub fn start_position(&self, tuning: &Tuning) -> Vec2 {
        let field = &tuning.playfield;
        let boss = &tuning.boss;
        let column = field.width - boss.rest_offset;
        match self {
            Entrance::Bottom => Vec2::new(column, field.height + boss.spawn_offset),
            Entrance::Top => Vec2::new(column, -boss.spawn_offset),
            Entrance::Right => Vec2::new(field.width + boss.spawn_offset, field.height / 2.0),
        }
    }
}

/// Rest position every entrance eases toward (right-center of the playfield)
pub fn boss_rest_position(tuning: &Tuning) -> Vec2 {
    Vec2::new(
        tuning.playfield.width - tuning.boss.rest_offset,
        tuning.playfield.height / 2.0,
    )
}

/// Boss lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossStage {
    /// Scripted entry animation; harmless
    Entering,
    /// Patrolling and shooting
    Engaging,
}

/// A boss projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Center
    pub pos: Vec2,
    /// Pixels per tick, fixed at creation
    pub vel: Vec2,
    /// Glyph diameter
    pub size: f32,
}

/// A boss enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    pub entrance: Entrance,
    /// Center
    pub pos: Vec2,
    /// Where the entrance animation started
    pub start: Vec2,
    /// Where the entrance animation ends
    pub target: Vec2,
    /// Entrance animation progress in [0, 1]
    pub entrance_progress: f32,
    /// Time of the last shot (or of the spawn, before the first shot)
    pub last_shot_ms: f64,
    /// Active projectiles, oldest first
    pub projectiles: Vec<Projectile>,
}

impl Boss {
    pub fn new(kind: BossKind, entrance: Entrance, now_ms: f64, tuning: &Tuning) -> Self {
        let start = entrance.start_position(tuning);
        Self {
            kind,
            entrance,
            pos: start,
            start,
            target: boss_rest_position(tuning),
            entrance_progress: 0.0,
            last_shot_ms: now_ms,
            projectiles: Vec::new(),
        }
    }

    pub fn stage(&self) -> BossStage {
        if self.entrance_progress < ENTRANCE_DONE {
            BossStage::Entering
        } else {
            BossStage::Engaging
        }
    }

    pub fn size(&self) -> f32 {
        self.kind.size()
    }
}

/// Level-complete screen flash
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashEffect {
    pub active: bool,
    pub frame: u32,
}

impl FlashEffect {
    pub fn trigger(&mut self) {
        self.active = true;
        self.frame = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one frame, deactivating after `duration` frames
    pub fn advance(&mut self, duration: u32) {
        if !self.active {
            return;
        }
        self.frame += 1;
        if self.frame >= duration {
            self.active = false;
        }
    }
}

/// Complete game session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance values in effect for this session
    pub tuning: Tuning,
    /// Level, scores and level-derived difficulty
    pub progress: Progression,
    /// Current phase
    pub phase: SessionPhase,
    /// Set when the phase becomes GameOver
    pub game_over_cause: Option<GameOverCause>,
    pub bird: Bird,
    /// Active pipes, oldest (leftmost) first
    pub pipes: Vec<Pipe>,
    pub bosses: Vec<Boss>,
    /// Time of the last pipe spawn; `None` spawns on the next playing tick
    pub last_spawn_ms: Option<f64>,
    pub flash: FlashEffect,
    /// Gate polled before the first flap (sprites loaded)
    pub assets_ready: bool,
}

impl GameState {
    /// New session at the configured starting level, waiting for the first flap
    pub fn new(tuning: Tuning) -> Self {
        let progress = Progression::new(tuning.levels.starting_level, &tuning);
        let bird = Bird::new(&tuning);
        Self {
            tuning,
            progress,
            phase: SessionPhase::NotStarted,
            game_over_cause: None,
            bird,
            pipes: Vec::new(),
            bosses: Vec::new(),
            last_spawn_ms: None,
            flash: FlashEffect::default(),
            assets_ready: true,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// Clear the playfield: bird back to spawn, no pipes or bosses
    fn reset_field(&mut self) {
        self.bird = Bird::new(&self.tuning);
        self.pipes.clear();
        self.bosses.clear();
        self.last_spawn_ms = None;
        self.flash.reset();
        self.game_over_cause = None;
    }

    /// Begin `level` immediately in the playing phase, keeping the total score
    pub fn start_level(&mut self, level: u32) {
        self.progress.enter_level(level, &self.tuning);
        self.reset_field();
        self.phase = SessionPhase::Playing;
        log::info!(
            "Level {} start: speed={:.2}, spawn interval={:.0}ms, total score={}",
            self.progress.level,
            self.progress.speed,
            self.progress.spawn_interval_ms,
            self.progress.total_score
        );
    }

    /// Back to the starting level with zeroed scores, waiting for the first flap
    pub fn restart(&mut self) {
        self.progress = Progression::new(self.tuning.levels.starting_level, &self.tuning);
        self.reset_field();
        self.phase = SessionPhase::NotStarted;
        log::info!("Restarted at level {}", self.progress.level);
    }

    /// Flap input. Starts the game on the first call; ignored after the run ends.
    pub fn flap(&mut self) {
        if !self.assets_ready {
            return;
        }
        match self.phase {
            SessionPhase::NotStarted => {
                self.phase = SessionPhase::Playing;
                self.bird.flap();
                log::info!("Game started at level {}", self.progress.level);
            }
            SessionPhase::Playing => self.bird.flap(),
            SessionPhase::GameOver | SessionPhase::LevelComplete => {}
        }
    }

    /// Move to the next level; ignored unless the current level is complete
    pub fn advance_level(&mut self) {
        if self.phase == SessionPhase::LevelComplete {
            self.start_level(self.progress.level + 1);
        }
    }

    /// End the run. Only the first cause while playing counts.
    pub fn end_game(&mut self, cause: GameOverCause) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.phase = SessionPhase::GameOver;
        self.game_over_cause = Some(cause);
        log::info!(
            "Game over ({:?}) at level {} with level score {}, total {}",
            cause,
            self.progress.level,
            self.progress.level_score,
            self.progress.total_score
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_for_flap() {
        let state = GameState::new(Tuning::default());
        assert_eq!(state.phase, SessionPhase::NotStarted);
        assert_eq!(state.bird.pos, Vec2::new(50.0, 200.0));
        assert_eq!(state.bird.velocity, 0.0);
        assert!(state.pipes.is_empty());
        assert!(state.bosses.is_empty());
    }

    #[test]
    fn test_first_flap_starts_game() {
        let mut state = GameState::new(Tuning::default());
        state.flap();
        assert_eq!(state.phase, SessionPhase::Playing);
        assert_eq!(state.bird.velocity, -4.5);
    }

    #[test]
    fn test_flap_waits_for_assets() {
        let mut state = GameState::new(Tuning::default());
        state.assets_ready = false;
        state.flap();
        assert_eq!(state.phase, SessionPhase::NotStarted);
        assert_eq!(state.bird.velocity, 0.0);
    }

    #[test]
    fn test_flap_ignored_after_game_over() {
        let mut state = GameState::new(Tuning::default());
        state.flap();
        assert!(state.end_game(GameOverCause::Pipe));
        state.bird.velocity = 3.0;
        state.flap();
        assert_eq!(state.bird.velocity, 3.0);
        assert_eq!(state.phase, SessionPhase::GameOver);
    }

    #[test]
    fn test_first_game_over_cause_wins() {
        let mut state = GameState::new(Tuning::default());
        state.flap();
        assert!(state.end_game(GameOverCause::Pipe));
        assert!(!state.end_game(GameOverCause::Projectile));
        assert_eq!(state.game_over_cause, Some(GameOverCause::Pipe));
    }

    #[test]
    fn test_advance_level_ignored_unless_complete() {
        let mut state = GameState::new(Tuning::default());
        state.flap();
        state.advance_level();
        assert_eq!(state.progress.level, 1);
        assert_eq!(state.phase, SessionPhase::Playing);

        state.phase = SessionPhase::LevelComplete;
        state.advance_level();
        assert_eq!(state.progress.level, 2);
        assert_eq!(state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_start_level_resets_field_keeps_total() {
        let tuning = Tuning::default();
        let mut state = GameState::new(tuning.clone());
        state.flap();
        state.progress.record_point();
        state.progress.record_point();
        state.pipes.push(Pipe {
            x: 300.0,
            gap_start_y: 200.0,
            scored: false,
        });
        state.bosses.push(Boss::new(BossKind::Ghost, Entrance::Right, 0.0, &tuning));
        state.bird.pos.y = 400.0;

        state.start_level(2);
        assert_eq!(state.progress.level, 2);
        assert_eq!(state.progress.level_score, 0);
        assert_eq!(state.progress.total_score, 2);
        assert!(state.pipes.is_empty());
        assert!(state.bosses.is_empty());
        assert_eq!(state.bird.pos.y, 200.0);
        assert_eq!(state.last_spawn_ms, None);
        assert_eq!(state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_bird_hitbox_inside_sprite() {
        let tuning = Tuning::default();
        let bird = Bird::new(&tuning);
        let hitbox = bird.hitbox(&tuning.bird.hitbox);
        let sprite = Aabb::from_rect(bird.pos.x, bird.pos.y, bird.size, bird.size);
        assert!(hitbox.left > sprite.left && hitbox.right < sprite.right);
        assert!(hitbox.top > sprite.top && hitbox.bottom < sprite.bottom);
        assert!((hitbox.left - 66.0).abs() < 1e-4);
        assert!((hitbox.top - 212.0).abs() < 1e-4);
    }

    #[test]
    fn test_pipe_boxes_frame_the_gap() {
        let tuning = Tuning::default();
        let pipe = Pipe {
            x: 100.0,
            gap_start_y: 200.0,
            scored: false,
        };
        let top = pipe.top_box(&tuning);
        let bottom = pipe.bottom_box(&tuning);
        assert_eq!(top.left, 108.0);
        assert_eq!(top.right, 152.0);
        assert_eq!(top.top, 5.0);
        assert_eq!(top.bottom, 195.0);
        assert_eq!(bottom.top, 355.0);
        assert_eq!(bottom.bottom, 595.0);
    }

    #[test]
    fn test_boss_roster_cycles() {
        assert_eq!(BossKind::for_level(1), BossKind::Ghost);
        assert_eq!(BossKind::for_level(2), BossKind::Demon);
        assert_eq!(BossKind::for_level(3), BossKind::Skull);
        assert_eq!(BossKind::for_level(4), BossKind::Ghost);
    }

    #[test]
    fn test_entrances_start_off_screen() {
        let tuning = Tuning::default();
        for entrance in Entrance::ALL {
            let p = entrance.start_position(&tuning);
            let on_screen = (0.0..=800.0).contains(&p.x) && (0.0..=600.0).contains(&p.y);
            assert!(!on_screen, "{:?} starts on screen at {:?}", entrance, p);
        }
    }

    #[test]
    fn test_flash_runs_for_duration() {
        let mut flash = FlashEffect::default();
        flash.trigger();
        for _ in 0..59 {
            flash.advance(60);
        }
        assert!(flash.active);
        flash.advance(60);
        assert!(!flash.active);
        flash.advance(60);
        assert_eq!(flash.frame, 60);
    }
}
