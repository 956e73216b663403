//! Per-frame simulation tick
//!
//! Core game loop that advances the session by one step.

use super::boss::{spawn_boss, update_boss};
use super::obstacles::{advance_pipes, cull_pipes, maybe_spawn_pipe};
use super::rng::RandomSource;
use super::state::{GameEvent, GameOverCause, GameState, SessionPhase};

/// Input commands for a single tick, applied before the update
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (click/tap/space); also starts the game
    pub flap: bool,
    /// Restart from the starting level
    pub restart: bool,
    /// Continue to the next level from the level-complete screen
    pub advance_level: bool,
    /// Idle/demo mode - AI flaps for the player
    pub idle_mode: bool,
}

/// Apply one tick's input, then advance the game state.
///
/// Returns the events produced during the tick, in the order they happened.
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    now_ms: f64,
    rng: &mut R,
) -> Vec<GameEvent> {
    if input.restart {
        state.restart();
    }
    if input.advance_level {
        state.advance_level();
    }
    if input.flap || (input.idle_mode && autopilot_wants_flap(state)) {
        state.flap();
    }

    update(state, now_ms, rng)
}

/// Advance the simulation by one step. A no-op unless playing, except that the
/// level-complete flash keeps animating.
pub fn update<R: RandomSource + ?Sized>(
    state: &mut GameState,
    now_ms: f64,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        SessionPhase::Playing => {}
        SessionPhase::LevelComplete => {
            state.flash.advance(state.tuning.levels.flash_frames);
            return events;
        }
        SessionPhase::NotStarted | SessionPhase::GameOver => return events,
    }

    state.bird.integrate();
    if let Some(cause) = check_bird_bounds(state) {
        if state.end_game(cause) {
            events.push(GameEvent::GameOver { cause });
        }
        return events;
    }

    if let Some(gap_start_y) = maybe_spawn_pipe(
        &mut state.pipes,
        &mut state.last_spawn_ms,
        &state.progress,
        now_ms,
        rng,
        &state.tuning,
    ) {
        events.push(GameEvent::PipeSpawned { gap_start_y });
    }

    let step = advance_pipes(&mut state.pipes, &state.bird, state.progress.speed, &state.tuning);
    if step.collided && state.end_game(GameOverCause::Pipe) {
        events.push(GameEvent::GameOver {
            cause: GameOverCause::Pipe,
        });
    }
    for _ in 0..step.points {
        state.progress.record_point();
        events.push(GameEvent::PointScored {
            level_score: state.progress.level_score,
            total_score: state.progress.total_score,
        });
    }
    cull_pipes(&mut state.pipes, &state.tuning);

    if state.progress.boss_due(&state.tuning) {
        let boss = spawn_boss(state.progress.level, now_ms, rng, &state.tuning);
        events.push(GameEvent::BossSpawned {
            kind: boss.kind,
            entrance: boss.entrance,
        });
        state.bosses.push(boss);
        state.progress.boss_has_appeared = true;
    }

    update_bosses(state, now_ms, rng, &mut events);

    if state.progress.is_level_complete(&state.tuning) && state.is_playing() {
        state.phase = SessionPhase::LevelComplete;
        state.flash.trigger();
        log::info!(
            "Level {} complete, total score {}",
            state.progress.level,
            state.progress.total_score
        );
        events.push(GameEvent::LevelComplete {
            level: state.progress.level,
        });
    }

    events
}

/// Ground band and playfield bounds. Clamps the bird back into range and
/// returns the cause when it went out.
pub fn check_bird_bounds(state: &mut GameState) -> Option<GameOverCause> {
    let field = &state.tuning.playfield;
    let bird = &mut state.bird;

    let ground_top = field.height - field.ground_height;
    if bird.pos.y + bird.size > ground_top {
        bird.pos.y = ground_top - bird.size;
        return Some(GameOverCause::Ground);
    }

    // Pipe hitboxes span the full height, so the canvas bounds are checked
    // separately from the ground band
    let max_y = (field.height - bird.size).max(0.0);
    if bird.pos.y > max_y || bird.pos.y < 0.0 {
        bird.pos.y = bird.pos.y.max(0.0).min(max_y);
        return Some(GameOverCause::OutOfBounds);
    }

    None
}

/// Update every boss and its projectiles, ending the game on contact
fn update_bosses<R: RandomSource + ?Sized>(
    state: &mut GameState,
    now_ms: f64,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let mut cause = None;
    for boss in state.bosses.iter_mut() {
        let step = update_boss(boss, &state.bird, &state.progress, now_ms, rng, &state.tuning);
        if let Some(angle) = step.fired {
            events.push(GameEvent::ProjectileFired {
                kind: boss.kind,
                angle,
            });
        }
        if cause.is_none() {
            if step.hit_by_boss {
                cause = Some(GameOverCause::Boss);
            } else if step.hit_by_projectile {
                cause = Some(GameOverCause::Projectile);
            }
        }
    }

    if let Some(cause) = cause {
        if state.end_game(cause) {
            events.push(GameEvent::GameOver { cause });
        }
    }
}

/// Demo AI: flap whenever the bird sinks below a line just under the middle of
/// the next gap it has not passed yet
pub fn autopilot_wants_flap(state: &GameState) -> bool {
    if state.phase == SessionPhase::NotStarted {
        return true;
    }
    if !state.is_playing() {
        return false;
    }

    let tuning = &state.tuning;
    let bird = &state.bird;
    let gap_center = state
        .pipes
        .iter()
        .find(|p| p.x + tuning.pipes.width > bird.pos.x)
        .map(|p| p.gap_start_y + tuning.pipes.gap / 2.0)
        .unwrap_or(tuning.playfield.height / 2.0);

    // Flapping peaks roughly jump^2 / (2 * gravity) above the trigger line, so
    // trigger a bit below center to keep the whole arc inside the gap
    let trigger = gap_center - bird.size / 2.0 + bird.size / 3.0;
    bird.pos.y > trigger
}
