// motion/mod.rs
//
// Scroll motion: the controller owning the on-screen offset, and the small
// time-based pieces it is built from.

pub mod controller;
pub mod countdown;
pub mod easing;
pub mod momentum;
pub mod transition;

use serde::{Deserialize, Serialize};

pub use controller::{DriveMode, MotionController, MotionEvent, MotionFrame, Pace, StartOutcome};
pub use countdown::{Countdown, CountdownStep};
pub use easing::{approach, ease, lerp, Easing};
pub use momentum::{DragTracker, Momentum};
pub use transition::{Transition, TransitionSpec};

/// Motion tuning, provided by the host or left at defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Follow mode: below this distance (px) the offset snaps to target (default: 1.0).
    pub dead_zone: f32,
    /// Follow mode: proportional easing rate per second (default: 10.0).
    pub follow_ease_rate: f32,
    /// Momentum velocity multiplier per step (default: 0.95).
    pub momentum_decay: f32,
    /// Momentum settles below this speed, px/s (default: 20.0).
    pub momentum_min_velocity: f32,
    /// Momentum integration rate, Hz (default: 60.0).
    pub momentum_step_hz: f32,
    /// A touch held still this long before release carries no momentum (default: 100 ms).
    pub touch_idle_ms: f64,
    /// Timed pace: px/s at speed 0 (default: 10.0).
    pub speed_base_pps: f32,
    /// Timed pace: extra px/s per speed unit (default: 8.0).
    pub speed_step_pps: f32,
    /// Curve handed to the rendering surface for timed scrolls (default: Linear).
    pub timed_easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            dead_zone: 1.0,
            follow_ease_rate: 10.0,
            momentum_decay: 0.95,
            momentum_min_velocity: 20.0,
            momentum_step_hz: 60.0,
            touch_idle_ms: 100.0,
            speed_base_pps: 10.0,
            speed_step_pps: 8.0,
            timed_easing: Easing::Linear,
        }
    }
}
