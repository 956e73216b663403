//! Flatchy - a side-scrolling flappy arcade game with levels and bosses
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, bosses, scoring)
//! - `session`: Boundary surface for a presentation layer (input, clock, snapshots)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors

pub mod error;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use session::{Clock, ManualClock, Session, Snapshot, SystemClock};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length for drivers that step at display refresh (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Firing angle used when boss and target coincide (points left, toward the bird side)
    pub const DEFAULT_FIRING_ANGLE: f32 = std::f32::consts::PI;

    /// Entrance animation is complete once progress reaches this value
    pub const ENTRANCE_DONE: f32 = 1.0;
}

/// Cubic ease-out: fast start, gentle landing. Input is clamped to [0, 1].
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Angle (radians) of the vector from `from` to `to`.
///
/// Falls back to [`consts::DEFAULT_FIRING_ANGLE`] for a zero-length vector
/// instead of producing NaN downstream.
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    if delta.length_squared() < f32::EPSILON {
        return consts::DEFAULT_FIRING_ANGLE;
    }
    delta.y.atan2(delta.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(1.5), 1.0);
        // Ease-out is ahead of linear in the middle
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - FRAC_PI_2).abs() < 1e-6);

        let b = angle_between(Vec2::new(5.0, 5.0), Vec2::new(-5.0, 5.0));
        assert!((b - PI).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_degenerate() {
        let p = Vec2::new(120.0, 80.0);
        let angle = angle_between(p, p);
        assert!(angle.is_finite());
        assert_eq!(angle, consts::DEFAULT_FIRING_ANGLE);
    }
}
