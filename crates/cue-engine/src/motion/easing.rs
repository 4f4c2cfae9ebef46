// motion/easing.rs
//
// Pure easing and interpolation helpers for scroll motion.
// No controller state, only math.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing curve for timed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity. What a reader expects from a timed scroll.
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Sine wave easing (gentle start and end).
    SineInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// One frame of proportional easing from `current` toward `target`.
///
/// Moves by `diff * rate * dt` (capped at the full distance), so the approach
/// speed is the same at any frame rate. Within `dead_zone` it snaps to `target`.
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32, dead_zone: f32) -> f32 {
    let diff = target - current;
    if diff.abs() < dead_zone {
        return target;
    }
    let k = (rate * dt).clamp(0.0, 1.0);
    current + diff * k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn quad_out_faster_start() {
        let mid = Easing::QuadOut.apply(0.5);
        assert!(mid > 0.5, "QuadOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(0.0, -1000.0, 0.25, Easing::Linear);
        assert!((result + 250.0).abs() < 0.001);
    }

    #[test]
    fn approach_snaps_inside_dead_zone() {
        assert_eq!(approach(-99.5, -100.0, 10.0, 1.0 / 60.0, 1.0), -100.0);
    }

    #[test]
    fn approach_is_frame_rate_independent_in_first_order() {
        // Two half frames land close to one full frame
        let one = approach(0.0, -100.0, 6.0, 1.0 / 30.0, 1.0);
        let half = approach(0.0, -100.0, 6.0, 1.0 / 60.0, 1.0);
        let two = approach(half, -100.0, 6.0, 1.0 / 60.0, 1.0);
        assert!((one - two).abs() < 2.0, "one {} vs two halves {}", one, two);
        assert!(one < 0.0 && one > -100.0);
    }

    #[test]
    fn approach_never_overshoots() {
        assert_eq!(approach(0.0, -10.0, 1000.0, 1.0, 0.5), -10.0);
    }
}
