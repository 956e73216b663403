//! Flatchy headless driver
//!
//! Plays the game on autopilot against a fixed-step clock, "rendering" through
//! the log and printing a JSON snapshot at every level boundary and at the end.
//!
//! Usage: `flatchy [seed] [tuning.json]`

use std::process::ExitCode;

use flatchy::consts::FRAME_MS;
use flatchy::sim::{GameEvent, SeededRandom, SessionPhase, TickInput};
use flatchy::{ManualClock, Session, Snapshot, Tuning};

const DEFAULT_SEED: u64 = 0xF1A7;
/// Stop after this many completed levels
const MAX_LEVELS: u32 = 5;
/// Ten minutes of play at 60 Hz
const MAX_FRAMES: u64 = 60 * 60 * 10;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Invalid seed {raw:?}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_SEED,
    };
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    log::info!("Flatchy (headless) starting with seed {seed}");
    let mut session = Session::new(tuning, ManualClock::default(), SeededRandom::new(seed));
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut frames = 0u64;
    let mut levels_cleared = 0u32;
    while session.is_running() && frames < MAX_FRAMES {
        session.clock_mut().advance(FRAME_MS);
        let events = session.tick_with(&input);
        frames += 1;
        render(frames, &session.snapshot(), &events);

        // Wait out the flash before moving on
        if session.phase() == SessionPhase::LevelComplete && !session.state().flash.active {
            print_snapshot(&session.snapshot());
            levels_cleared += 1;
            if levels_cleared >= MAX_LEVELS {
                break;
            }
            session.advance_level();
        }
    }

    let end = session.snapshot();
    if end.phase == SessionPhase::GameOver {
        print_snapshot(&end);
    }
    log::info!(
        "Stopped after {frames} frames: level {}, total score {}",
        end.level,
        end.total_score
    );
    ExitCode::SUCCESS
}

fn render(frame: u64, snapshot: &Snapshot, events: &[GameEvent]) {
    for event in events {
        if let GameEvent::PointScored {
            level_score,
            total_score,
        } = event
        {
            log::info!("Score {level_score} (total {total_score})");
        }
    }
    log::trace!(
        "frame {frame}: bird y={:.1} v={:.2}, {} pipes, {} bosses",
        snapshot.bird.y,
        snapshot.bird.velocity,
        snapshot.pipes.len(),
        snapshot.bosses.len()
    );
}

fn print_snapshot(snapshot: &Snapshot) {
    match serde_json::to_string(snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
