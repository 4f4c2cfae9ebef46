// motion/transition.rs
//
// A single timed offset transition, the scroll counterpart of a one-shot tween.
// The rendering surface may animate it natively from `spec()`; the controller
// still advances it every frame so a mid-flight stop knows where it is.

use super::easing::{ease, Easing};

/// What the rendering surface needs to run the transition itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub from: f32,
    pub to: f32,
    /// Duration in seconds.
    pub duration: f32,
    pub easing: Easing,
}

/// A one-shot offset animation.
#[derive(Debug, Clone)]
pub struct Transition {
    from: f32,
    to: f32,
    /// Duration in seconds.
    duration: f32,
    /// Elapsed time in seconds.
    elapsed: f32,
    easing: Easing,
}

impl Transition {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Interpolated value at the current elapsed time.
    pub fn value(&self) -> f32 {
        ease(self.from, self.to, self.progress(), self.easing)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Seconds left until the target is reached.
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn spec(&self) -> TransitionSpec {
        TransitionSpec {
            from: self.from,
            to: self.to,
            duration: self.duration,
            easing: self.easing,
        }
    }
}
