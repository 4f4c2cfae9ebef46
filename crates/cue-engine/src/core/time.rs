/// Refresh rate assumed when the host has no display-synchronized callback.
pub const FALLBACK_FRAME_HZ: f32 = 60.0;

/// Longest frame delta accepted, in seconds. Longer gaps (tab hidden, debugger)
/// are treated as one long frame instead of a jump.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Fixed timestep accumulator.
/// Runs fixed-interval steps (momentum, countdown seconds) regardless of frame timing.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Most steps returned from one `accumulate` call.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    /// Accumulator that never reports more than `max_steps` at once.
    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !(frame_dt > 0.0) || !(self.dt > 0.0) {
            return 0;
        }
        self.accumulator += frame_dt;
        // Cap to prevent a spiral of steps after a stall
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        // Tolerate float drift so exact multiples of dt produce their step
        let steps = ((self.accumulator + self.dt * 1e-4) / self.dt) as u32;
        self.accumulator = (self.accumulator - steps as f32 * self.dt).max(0.0);
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Converts host timestamps into frame deltas.
///
/// Works the same whether timestamps come from a refresh-synchronized callback
/// or from a fallback interval timer.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call after a reset yields one fallback frame.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms >= last => ((now_ms - last) / 1000.0) as f32,
            Some(_) => 0.0,
            None => 1.0 / FALLBACK_FRAME_HZ,
        };
        self.last_ms = Some(now_ms);
        dt.min(MAX_FRAME_DT)
    }

    /// Forget the last timestamp (loop stopped, next frame starts fresh).
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Interval, in milliseconds, a timer-driven host should use.
    pub fn fallback_interval_ms() -> f64 {
        1000.0 / FALLBACK_FRAME_HZ as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_max_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);

        let mut seconds = FixedTimestep::with_max_steps(1.0, 3);
        assert_eq!(seconds.accumulate(10.0), 3);
    }

    #[test]
    fn whole_seconds_from_frames() {
        let mut seconds = FixedTimestep::new(1.0);
        let mut total = 0;
        for _ in 0..120 {
            total += seconds.accumulate(1.0 / 60.0);
        }
        assert_eq!(total, 2);
    }

    #[test]
    fn ignores_non_positive_dt() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        // Nothing was banked, so a full frame still yields exactly one step
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn frame_clock_deltas() {
        let mut clock = FrameClock::new();
        let first = clock.delta(1000.0);
        assert!((first - 1.0 / 60.0).abs() < 1e-6);
        assert!((clock.delta(1033.0) - 0.033).abs() < 1e-5);
        // Backward timestamps never produce negative time
        assert_eq!(clock.delta(1000.0), 0.0);
        // Long stalls are clamped
        assert_eq!(clock.delta(9000.0), MAX_FRAME_DT);
        clock.reset();
        assert!((clock.delta(50_000.0) - 1.0 / 60.0).abs() < 1e-6);
    }
}
