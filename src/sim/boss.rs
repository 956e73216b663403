//! Boss behavior: entrance animation, patrol, shooting and projectiles
//!
//! A boss spends its first ticks easing in from off-screen (`Entering`) and is
//! harmless until the entrance completes. After that (`Engaging`) it drifts
//! left within the right half of the playfield, sways vertically on a wall-clock
//! sinusoid, and fires at the bird at least once per `min_shot_interval_ms`.

use glam::Vec2;

use super::geometry::circles_overlap;
use super::progression::Progression;
use super::rng::RandomSource;
use super::state::{Bird, Boss, BossKind, BossStage, Entrance, Projectile};
use crate::tuning::Tuning;
use crate::{angle_between, direction, ease_out_cubic};

/// Summon the level's boss from a random entrance
pub fn spawn_boss<R: RandomSource + ?Sized>(
    level: u32,
    now_ms: f64,
    rng: &mut R,
    tuning: &Tuning,
) -> Boss {
    let kind = BossKind::for_level(level);
    let entrance = Entrance::ALL[rng.index(Entrance::ALL.len())];
    log::info!("{:?} boss entering from {:?} on level {}", kind, entrance, level);
    Boss::new(kind, entrance, now_ms, tuning)
}

/// What happened to a boss during one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossStep {
    /// Boss body touched the bird
    pub hit_by_boss: bool,
    /// A projectile touched the bird
    pub hit_by_projectile: bool,
    /// Angle of the shot fired this tick, if any
    pub fired: Option<f32>,
}

impl BossStep {
    pub fn hit(&self) -> bool {
        self.hit_by_boss || self.hit_by_projectile
    }
}

/// Advance the entrance animation one step toward the rest position
pub fn advance_entrance(boss: &mut Boss, tuning: &Tuning) {
    boss.entrance_progress = (boss.entrance_progress + tuning.boss.entrance_step).min(1.0);
    let eased = ease_out_cubic(boss.entrance_progress);
    boss.pos = boss.start.lerp(boss.target, eased);
}

/// Leftward drift inside the right half, wrapping back to the right edge
pub fn patrol(boss: &mut Boss, progress: &Progression, now_ms: f64, tuning: &Tuning) {
    let field = &tuning.playfield;
    let params = &tuning.boss;
    let half = field.width / 2.0;

    let boss_speed = progress.speed * progress.growth(params.speed_growth);
    if boss.pos.x < half {
        boss.pos.x = half;
    }
    boss.pos.x -= boss_speed * params.drift_factor;
    if boss.pos.x < half {
        boss.pos.x = field.width - params.wrap_margin;
    }

    let time_scale = progress.growth(params.sway_time_growth) as f64;
    let amplitude = params.sway_amplitude + progress.level as f32 * params.sway_amplitude_per_level;
    let phase = (now_ms / 1000.0 * time_scale).sin() as f32;
    let band = field.height * params.vertical_band;
    // min/max rather than clamp: a negative band from bad tuning must not panic
    boss.pos.y = field.height / 2.0 + (phase * amplitude).max(-band).min(band);
}

/// Fire at the bird if the shot interval has passed or the per-tick draw succeeds.
///
/// The random draw is skipped when a shot is already forced.
pub fn try_fire<R: RandomSource + ?Sized>(
    boss: &mut Boss,
    target: Vec2,
    progress: &Progression,
    now_ms: f64,
    rng: &mut R,
    tuning: &Tuning,
) -> Option<f32> {
    let params = &tuning.boss;
    let forced = now_ms - boss.last_shot_ms > params.min_shot_interval_ms;
    let chance = params.fire_chance * progress.growth(params.fire_chance_growth);
    if !forced && rng.next_unit() >= chance {
        return None;
    }

    let angle = angle_between(boss.pos, target);
    let speed = params.projectile_speed * progress.growth(params.projectile_speed_growth);
    boss.projectiles.push(Projectile {
        pos: boss.pos,
        vel: direction(angle) * speed,
        size: boss.kind.projectile_size(),
    });
    boss.last_shot_ms = now_ms;
    log::debug!(
        "{:?} fired at {:.2} rad ({})",
        boss.kind,
        angle,
        if forced { "forced" } else { "random" }
    );
    Some(angle)
}

/// Move projectiles, report whether any touched the bird, and drop those that
/// left the playfield by more than their own size
pub fn advance_projectiles(projectiles: &mut Vec<Projectile>, bird: &Bird, tuning: &Tuning) -> bool {
    let bird_center = bird.center();
    let mut hit = false;
    for projectile in projectiles.iter_mut() {
        projectile.pos += projectile.vel;
        if circles_overlap(projectile.pos, projectile.size, bird_center, bird.size) {
            hit = true;
        }
    }

    let (width, height) = (tuning.playfield.width, tuning.playfield.height);
    projectiles.retain(|p| {
        p.pos.x > -p.size && p.pos.x < width + p.size && p.pos.y > -p.size && p.pos.y < height + p.size
    });
    hit
}

/// One tick of boss behavior
pub fn update_boss<R: RandomSource + ?Sized>(
    boss: &mut Boss,
    bird: &Bird,
    progress: &Progression,
    now_ms: f64,
    rng: &mut R,
    tuning: &Tuning,
) -> BossStep {
    let mut step = BossStep::default();

    if boss.stage() == BossStage::Entering {
        advance_entrance(boss, tuning);
        return step;
    }

    patrol(boss, progress, now_ms, tuning);

    step.hit_by_boss = circles_overlap(boss.pos, boss.size(), bird.center(), bird.size);
    // Aimed at the bird's sprite origin, not its center
    step.fired = try_fire(boss, bird.pos, progress, now_ms, rng, tuning);
    step.hit_by_projectile = advance_projectiles(&mut boss.projectiles, bird, tuning);
    step
}
