//! Pipe spawning, scrolling, collision and scoring

use super::geometry::boxes_overlap;
use super::progression::Progression;
use super::rng::RandomSource;
use super::state::{Bird, Pipe};
use crate::tuning::Tuning;

/// Top of a new gap, uniform in `[margin, height - gap - margin]`.
///
/// A gap too tall for the playfield collapses to `margin` instead of panicking.
pub fn random_gap_start<R: RandomSource + ?Sized>(rng: &mut R, tuning: &Tuning) -> f32 {
    let pipes = &tuning.pipes;
    let max = (tuning.playfield.height - pipes.gap - pipes.margin).max(pipes.margin);
    rng.range(pipes.margin, max).max(pipes.margin).min(max)
}

/// Spawn a pipe at the right edge if the interval has elapsed and the level
/// still needs more pipes. Returns the new pipe's gap start.
///
/// Pipes already in flight count toward the level target, so no more than
/// `points_per_level` pipes are ever spawned in one level.
pub fn maybe_spawn_pipe<R: RandomSource + ?Sized>(
    pipes: &mut Vec<Pipe>,
    last_spawn_ms: &mut Option<f64>,
    progress: &Progression,
    now_ms: f64,
    rng: &mut R,
    tuning: &Tuning,
) -> Option<f32> {
    let interval_elapsed = match *last_spawn_ms {
        Some(last) => now_ms - last > progress.spawn_interval_ms,
        None => true,
    };
    if !interval_elapsed {
        return None;
    }

    let unscored = pipes.iter().filter(|p| !p.scored).count();
    if progress.pipes_needed(unscored, tuning) == 0 {
        return None;
    }

    let gap_start_y = random_gap_start(rng, tuning);
    pipes.push(Pipe {
        x: tuning.playfield.width,
        gap_start_y,
        scored: false,
    });
    *last_spawn_ms = Some(now_ms);
    log::debug!("Pipe spawned at gap y={:.1}", gap_start_y);
    Some(gap_start_y)
}

/// Bird hitbox overlaps either half of the pipe
pub fn pipe_collides(bird: &Bird, pipe: &Pipe, tuning: &Tuning) -> bool {
    let hitbox = bird.hitbox(&tuning.bird.hitbox);
    boxes_overlap(&hitbox, &pipe.top_box(tuning)) || boxes_overlap(&hitbox, &pipe.bottom_box(tuning))
}

/// Outcome of advancing the pipes one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipeStep {
    /// Some pipe overlapped the bird
    pub collided: bool,
    /// Pipes passed for the first time this tick
    pub points: u32,
}

/// Scroll every pipe left by `speed`, check collisions and mark newly passed pipes.
///
/// A pipe is passed once its right edge is left of the bird's x; each pipe
/// scores at most once.
pub fn advance_pipes(pipes: &mut [Pipe], bird: &Bird, speed: f32, tuning: &Tuning) -> PipeStep {
    let mut step = PipeStep::default();
    let width = tuning.pipes.width;
    for pipe in pipes.iter_mut() {
        pipe.x -= speed;

        if pipe_collides(bird, pipe, tuning) {
            step.collided = true;
        }

        if !pipe.scored && pipe.x + width < bird.pos.x {
            pipe.scored = true;
            step.points += 1;
        }
    }
    step
}

/// Drop pipes that have scrolled fully off the left edge
pub fn cull_pipes(pipes: &mut Vec<Pipe>, tuning: &Tuning) {
    let width = tuning.pipes.width;
    pipes.retain(|p| p.x > -width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SeededRandom;
    use proptest::prelude::*;

    fn pipe_at(x: f32, gap_start_y: f32) -> Pipe {
        Pipe {
            x,
            gap_start_y,
            scored: false,
        }
    }

    #[test]
    fn test_gap_always_leaves_passage() {
        let tuning = Tuning::default();
        let mut rng = SeededRandom::new(2024);
        let (margin, gap, height) = (tuning.pipes.margin, tuning.pipes.gap, tuning.playfield.height);
        for _ in 0..1000 {
            let y = random_gap_start(&mut rng, &tuning);
            assert!(y >= margin, "gap start {} above margin", y);
            assert!(y + gap <= height - margin, "gap end {} below margin", y + gap);
        }
    }

    #[test]
    fn test_first_spawn_is_immediate() {
        let tuning = Tuning::default();
        let progress = Progression::new(1, &tuning);
        let mut pipes = Vec::new();
        let mut last = None;
        let mut rng = SeededRandom::new(1);

        let spawned = maybe_spawn_pipe(&mut pipes, &mut last, &progress, 5.0, &mut rng, &tuning);
        assert!(spawned.is_some());
        assert_eq!(pipes.len(), 1);
        assert_eq!(pipes[0].x, 800.0);
        assert_eq!(last, Some(5.0));
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let tuning = Tuning::default();
        let progress = Progression::new(1, &tuning);
        let mut pipes = Vec::new();
        let mut last = Some(1000.0);
        let mut rng = SeededRandom::new(1);

        // Exactly the interval is not enough; it must be exceeded
        assert!(maybe_spawn_pipe(&mut pipes, &mut last, &progress, 3000.0, &mut rng, &tuning).is_none());
        assert!(maybe_spawn_pipe(&mut pipes, &mut last, &progress, 3000.5, &mut rng, &tuning).is_some());
        assert_eq!(last, Some(3000.5));
    }

    #[test]
    fn test_higher_levels_spawn_sooner() {
        let tuning = Tuning::default();
        let progress = Progression::new(5, &tuning);
        let mut pipes = Vec::new();
        let mut last = Some(0.0);
        let mut rng = SeededRandom::new(1);
        // 2000 / 1.2 ≈ 1667ms
        assert!(maybe_spawn_pipe(&mut pipes, &mut last, &progress, 1700.0, &mut rng, &tuning).is_some());
    }

    #[test]
    fn test_spawn_respects_level_quota() {
        let tuning = Tuning::default();
        let mut progress = Progression::new(1, &tuning);
        for _ in 0..7 {
            progress.record_point();
        }
        let mut pipes: Vec<Pipe> = (0..3).map(|i| pipe_at(400.0 + i as f32 * 200.0, 200.0)).collect();
        let mut last = None;
        let mut rng = SeededRandom::new(1);

        // 7 scored + 3 in flight = 10, quota met
        assert!(maybe_spawn_pipe(&mut pipes, &mut last, &progress, 10_000.0, &mut rng, &tuning).is_none());
        assert_eq!(pipes.len(), 3);

        // Scored pipes still on screen don't count twice
        pipes[0].scored = true;
        assert!(maybe_spawn_pipe(&mut pipes, &mut last, &progress, 10_000.0, &mut rng, &tuning).is_some());
    }

    #[test]
    fn test_oversized_gap_falls_back_to_margin() {
        let mut tuning = Tuning::default();
        tuning.pipes.gap = 560.0;
        let mut rng = SeededRandom::new(4);
        for _ in 0..20 {
            assert_eq!(random_gap_start(&mut rng, &tuning), 50.0);
        }
    }

    #[test]
    fn test_bird_in_gap_does_not_collide() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(&tuning);
        bird.pos.y = 250.0;
        let pipe = pipe_at(40.0, 225.0);
        assert!(!pipe_collides(&bird, &pipe, &tuning));
    }

    #[test]
    fn test_bird_hits_top_and_bottom_pipe() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(&tuning);
        let pipe = pipe_at(40.0, 300.0);

        bird.pos.y = 150.0;
        assert!(pipe_collides(&bird, &pipe, &tuning));

        bird.pos.y = 450.0;
        assert!(pipe_collides(&bird, &pipe, &tuning));
    }

    #[test]
    fn test_padding_forgives_near_miss() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(&tuning);
        // Bird sprite bottom edge pokes 4px into the lower pipe sprite, but the
        // hitboxes stay apart
        let pipe = pipe_at(40.0, 200.0);
        bird.pos.y = 350.0 - 44.0;
        assert!(!pipe_collides(&bird, &pipe, &tuning));
    }

    #[test]
    fn test_score_once_per_pipe() {
        let tuning = Tuning::default();
        let bird = Bird::new(&tuning);
        // Right edge at 51, just right of the bird's x=50
        let mut pipes = vec![pipe_at(-9.0, 200.0)];
        // Keep the bird clear of the pipe for this check
        let mut safe_bird = bird.clone();
        safe_bird.pos.y = 260.0;

        let mut total = 0;
        for _ in 0..20 {
            total += advance_pipes(&mut pipes, &safe_bird, 1.8, &tuning).points;
        }
        assert_eq!(total, 1);
        assert!(pipes[0].scored);
    }

    #[test]
    fn test_cull_offscreen_pipes() {
        let tuning = Tuning::default();
        let mut pipes = vec![pipe_at(-61.0, 200.0), pipe_at(-60.0, 200.0), pipe_at(-59.0, 200.0)];
        cull_pipes(&mut pipes, &tuning);
        assert_eq!(pipes.len(), 1);
        assert_eq!(pipes[0].x, -59.0);
    }

    proptest! {
        #[test]
        fn prop_gap_fits_for_any_seed(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut rng = SeededRandom::new(seed);
            let y = random_gap_start(&mut rng, &tuning);
            prop_assert!(y >= tuning.pipes.margin);
            prop_assert!(y + tuning.pipes.gap <= tuning.playfield.height - tuning.pipes.margin);
        }
    }
}
