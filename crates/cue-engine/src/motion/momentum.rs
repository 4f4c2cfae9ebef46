use crate::core::time::FixedTimestep;

/// Inertial scroll after a touch release.
///
/// Integrates at a fixed step so the decay curve does not depend on frame
/// timing: each step moves by `velocity * step` and multiplies velocity by
/// `decay`. Settles once speed drops under `min_velocity`.
#[derive(Debug, Clone)]
pub struct Momentum {
    velocity: f32,
    decay: f32,
    min_velocity: f32,
    steps: FixedTimestep,
    settled: bool,
}

impl Momentum {
    /// `velocity` in px/s, `step_hz` the integration rate.
    pub fn new(velocity: f32, decay: f32, min_velocity: f32, step_hz: f32) -> Self {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let settled = velocity.abs() < min_velocity;
        Self {
            velocity: if settled { 0.0 } else { velocity },
            decay: decay.clamp(0.0, 0.999),
            min_velocity,
            steps: FixedTimestep::with_max_steps(1.0 / step_hz.max(1.0), 30),
            settled,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Run the steps due in `dt`; returns the offset delta they produce.
    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.settled {
            return 0.0;
        }
        let step = self.steps.dt();
        let mut delta = 0.0;
        for _ in 0..self.steps.accumulate(dt) {
            delta += self.velocity * step;
            self.velocity *= self.decay;
            if self.velocity.abs() < self.min_velocity {
                self.velocity = 0.0;
                self.settled = true;
                break;
            }
        }
        delta
    }
}

/// Instantaneous drag velocity from successive pointer samples.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    last_y: f32,
    last_t_ms: f64,
    velocity: f32,
}

impl DragTracker {
    pub fn new(y: f32, t_ms: f64) -> Self {
        Self {
            last_y: y,
            last_t_ms: t_ms,
            velocity: 0.0,
        }
    }

    /// Record a sample; returns the vertical delta since the previous one.
    pub fn sample(&mut self, y: f32, t_ms: f64) -> f32 {
        let dy = y - self.last_y;
        let dt = ((t_ms - self.last_t_ms) / 1000.0) as f32;
        if dt > 0.0 {
            self.velocity = dy / dt;
        }
        self.last_y = y;
        self.last_t_ms = t_ms;
        dy
    }

    /// Velocity at release; zero if the finger rested longer than `idle_ms`.
    pub fn release_velocity(&self, t_ms: f64, idle_ms: f64) -> f32 {
        if t_ms - self.last_t_ms > idle_ms {
            0.0
        } else {
            self.velocity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_release_settles_immediately() {
        let mut m = Momentum::new(5.0, 0.95, 20.0, 60.0);
        assert!(m.is_settled());
        assert_eq!(m.tick(1.0), 0.0);
    }

    #[test]
    fn decays_and_settles() {
        let mut m = Momentum::new(-1200.0, 0.95, 20.0, 60.0);
        let mut travelled = 0.0;
        for _ in 0..600 {
            travelled += m.tick(1.0 / 60.0);
            if m.is_settled() {
                break;
            }
        }
        assert!(m.is_settled());
        // Geometric series bound: v * step / (1 - decay) = 400px
        assert!(travelled < 0.0 && travelled > -400.0, "travelled {}", travelled);
    }

    #[test]
    fn same_path_at_any_frame_rate() {
        let mut fast = Momentum::new(900.0, 0.95, 20.0, 60.0);
        let mut slow = Momentum::new(900.0, 0.95, 20.0, 60.0);
        let mut a = 0.0;
        let mut b = 0.0;
        for _ in 0..240 {
            a += fast.tick(1.0 / 120.0);
        }
        for _ in 0..60 {
            b += slow.tick(1.0 / 30.0);
        }
        assert!((a - b).abs() < 1.0, "{} vs {}", a, b);
    }

    #[test]
    fn drag_velocity() {
        let mut drag = DragTracker::new(300.0, 0.0);
        assert_eq!(drag.sample(290.0, 16.0), -10.0);
        assert!((drag.release_velocity(20.0, 100.0) + 625.0).abs() < 0.01);
        // Finger held still before lifting
        assert_eq!(drag.release_velocity(500.0, 100.0), 0.0);
    }
}
