use crate::core::time::FixedTimestep;

/// Result of advancing a countdown by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// No second boundary crossed.
    Waiting,
    /// A second elapsed; the value to display now.
    Tick(u32),
    /// Reached zero; the gated action may start.
    Done,
}

/// Whole-second pre-roll before a timed scroll.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    seconds: FixedTimestep,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            seconds: FixedTimestep::with_max_steps(1.0, seconds.max(1)),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self, dt: f32) -> CountdownStep {
        if self.remaining == 0 {
            return CountdownStep::Done;
        }
        let elapsed = self.seconds.accumulate(dt);
        if elapsed == 0 {
            return CountdownStep::Waiting;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining == 0 {
            CountdownStep::Done
        } else {
            CountdownStep::Tick(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_once_per_second() {
        let mut c = Countdown::new(3);
        let mut ticks = Vec::new();
        for _ in 0..(60 * 3) {
            match c.tick(1.0 / 60.0) {
                CountdownStep::Tick(n) => ticks.push(n),
                CountdownStep::Done => {
                    ticks.push(0);
                    break;
                }
                CountdownStep::Waiting => {}
            }
        }
        assert_eq!(ticks, vec![2, 1, 0]);
    }

    #[test]
    fn long_frame_skips_ahead() {
        let mut c = Countdown::new(5);
        assert_eq!(c.tick(2.0), CountdownStep::Tick(3));
        assert_eq!(c.tick(10.0), CountdownStep::Done);
    }

    #[test]
    fn zero_is_done() {
        let mut c = Countdown::new(0);
        assert_eq!(c.tick(0.0), CountdownStep::Done);
    }
}
