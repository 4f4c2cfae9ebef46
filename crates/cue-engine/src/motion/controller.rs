// motion/controller.rs
//
// Single owner of the scroll offset. Arbitrates between the timed driver, the
// speech-follow driver and manual touch. Exactly one of them moves the offset
// at any time; touch always wins and suspends (never races) the others.
//
// Offsets are pixels: 0 is the start position, negative is scrolled forward.

use log::{debug, info, warn};

use super::countdown::{Countdown, CountdownStep};
use super::easing::approach;
use super::momentum::{DragTracker, Momentum};
use super::transition::{Transition, TransitionSpec};
use super::MotionConfig;
use crate::matcher::StreamMatcher;

/// Which mechanism currently drives the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveMode {
    #[default]
    Idle,
    Timed,
    Follow,
    Manual,
}

/// How fast a timed scroll runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pace {
    /// Flat speed setting: `speed * speed_step_pps + speed_base_pps` px/s.
    Speed(f32),
    /// Reading rate over the script's reading units, spread over the content height.
    Wpm { wpm: f32, units: usize },
}

impl Pace {
    /// Seconds needed to cover `distance` px of a `total_distance` px scroll.
    pub fn duration(self, distance: f32, total_distance: f32, config: &MotionConfig) -> f32 {
        match self {
            Pace::Speed(speed) => {
                let pps = (speed * config.speed_step_pps + config.speed_base_pps).max(1.0);
                distance / pps
            }
            Pace::Wpm { wpm, units } => {
                if total_distance <= 0.0 {
                    return 0.0;
                }
                let full = units as f32 / wpm.max(1.0) * 60.0;
                full * distance / total_distance
            }
        }
    }
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Timed scroll gated on a countdown with this many seconds.
    CountingDown(u32),
    /// Content or viewport not measured yet; retry shortly.
    LayoutPending,
    /// Nothing left to scroll. Not running.
    AtEnd,
}

/// Notifications for the rendering surface, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    CountdownTick(u32),
    /// A timed transition the surface may animate natively.
    TransitionStarted(TransitionSpec),
    /// Timed motion stopped at this offset; no transition should remain.
    Frozen { offset: f32 },
    /// A timed scroll reached the end.
    Finished,
    FollowTarget { fraction: f32, target: f32 },
    ModeChanged(DriveMode),
    Running(bool),
}

/// Per-frame output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionFrame {
    pub offset: f32,
    pub target: f32,
    pub mode: DriveMode,
    pub running: bool,
    pub countdown: Option<u32>,
}

/// Automatic driver on hold during a touch or an explicit pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suspended {
    Timed,
    Follow,
}

#[derive(Debug)]
enum ManualPhase {
    Dragging(DragTracker),
    Coasting(Momentum),
}

pub struct MotionController {
    config: MotionConfig,
    offset: f32,
    target: f32,
    mode: DriveMode,
    running: bool,
    content_extent: f32,
    viewport_extent: f32,
    line_height: f32,
    pace: Pace,
    countdown: Option<Countdown>,
    transition: Option<Transition>,
    matcher: Option<Box<dyn StreamMatcher>>,
    manual: Option<ManualPhase>,
    resume_after_touch: Option<Suspended>,
    /// Paused driver, the offset it was paused at, and any countdown still owed.
    paused: Option<(Suspended, f32, Option<Countdown>)>,
    events: Vec<MotionEvent>,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            offset: 0.0,
            target: 0.0,
            mode: DriveMode::Idle,
            running: false,
            content_extent: 0.0,
            viewport_extent: 0.0,
            line_height: 0.0,
            pace: Pace::Speed(5.0),
            countdown: None,
            transition: None,
            matcher: None,
            manual: None,
            resume_after_touch: None,
            paused: None,
            events: Vec::with_capacity(8),
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MotionConfig) {
        self.config = config;
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    pub fn has_matcher(&self) -> bool {
        self.matcher.is_some()
    }

    /// Matcher progress while one exists.
    pub fn matcher_progress(&self) -> Option<f32> {
        self.matcher.as_ref().map(|m| m.progress())
    }

    pub fn content_extent(&self) -> f32 {
        self.content_extent
    }

    pub fn viewport_extent(&self) -> f32 {
        self.viewport_extent
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown.as_ref().map(|c| c.remaining())
    }

    /// The in-flight timed transition, if any.
    pub fn transition(&self) -> Option<TransitionSpec> {
        self.transition.as_ref().map(|t| t.spec())
    }

    /// Seconds left in the in-flight timed transition, 0 if none.
    pub fn transition_remaining(&self) -> f32 {
        self.transition.as_ref().map_or(0.0, |t| t.remaining())
    }

    /// Both extents measured.
    pub fn has_layout(&self) -> bool {
        self.content_extent > 0.0 && self.viewport_extent > 0.0
    }

    /// Where a complete scroll ends.
    pub fn end_offset(&self) -> f32 {
        -self.content_extent
    }

    /// Script fraction currently at the focus line, derived from geometry.
    pub fn fraction_at_offset(&self) -> f32 {
        if self.content_extent <= 0.0 {
            return 0.0;
        }
        ((-self.offset - self.line_height) / self.content_extent).clamp(0.0, 1.0)
    }

    pub fn frame(&self) -> MotionFrame {
        MotionFrame {
            offset: self.offset,
            target: self.target,
            mode: self.mode,
            running: self.running,
            countdown: self.countdown(),
        }
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<MotionEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Layout --

    /// Record measured extents. Zero means "not laid out yet".
    pub fn set_layout(&mut self, content_extent: f32, viewport_extent: f32) {
        let content = if content_extent.is_finite() { content_extent.max(0.0) } else { 0.0 };
        let viewport = if viewport_extent.is_finite() { viewport_extent.max(0.0) } else { 0.0 };
        let changed = (content - self.content_extent).abs() > f32::EPSILON;
        self.content_extent = content;
        self.viewport_extent = viewport;

        // Re-aim an in-flight timed scroll at the new end
        if changed && self.transition.is_some() {
            self.freeze(None);
            self.begin_transition();
        }
    }

    pub fn set_line_height(&mut self, line_height: f32) {
        if line_height.is_finite() {
            self.line_height = line_height.max(0.0);
        }
    }

    // -- Timed --

    /// Start a timed scroll to the end, optionally behind a countdown.
    pub fn start_timed(&mut self, pace: Pace, countdown_secs: u32) -> StartOutcome {
        self.stop(None);
        if !self.has_layout() {
            debug!("motion: timed start deferred, layout not ready");
            return StartOutcome::LayoutPending;
        }
        if (self.end_offset() - self.offset).abs() < 0.5 {
            return StartOutcome::AtEnd;
        }
        if let Pace::Wpm { units: 0, .. } = pace {
            warn!("motion: nothing to read, timed scroll not started");
            return StartOutcome::AtEnd;
        }

        self.pace = pace;
        self.set_mode(DriveMode::Timed);
        if countdown_secs > 0 {
            self.countdown = Some(Countdown::new(countdown_secs));
            self.events.push(MotionEvent::CountdownTick(countdown_secs));
            return StartOutcome::CountingDown(countdown_secs);
        }
        self.begin_transition()
    }

    /// Stop a timed scroll at its true current position.
    ///
    /// `observed` is the offset the rendering surface actually shows; when it is
    /// not available the controller's own interpolation is used.
    pub fn stop_timed(&mut self, observed: Option<f32>) {
        let timed = self.mode == DriveMode::Timed
            || self.resume_after_touch == Some(Suspended::Timed)
            || matches!(self.paused, Some((Suspended::Timed, _, _)));
        if timed {
            self.stop(observed);
        }
    }

    fn begin_transition(&mut self) -> StartOutcome {
        let to = self.end_offset();
        let distance = (to - self.offset).abs();
        let duration = self.pace.duration(distance, self.content_extent, &self.config);
        // A zero-length transition would jump straight to the end
        if !self.has_layout() || distance < 0.5 || !(duration > 0.0) {
            self.target = self.offset;
            self.set_mode(DriveMode::Idle);
            self.set_running(false);
            return StartOutcome::AtEnd;
        }

        let transition = Transition::new(self.offset, to, duration, self.config.timed_easing);
        info!(
            "motion: timed scroll {:.0}px over {:.1}s",
            distance, duration
        );
        self.events.push(MotionEvent::TransitionStarted(transition.spec()));
        self.target = to;
        self.transition = Some(transition);
        self.set_mode(DriveMode::Timed);
        self.set_running(true);
        StartOutcome::Started
    }

    /// Pin the offset at the transition's current value (or `observed`).
    fn freeze(&mut self, observed: Option<f32>) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        let at = observed
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| transition.value());
        self.offset = at;
        self.target = at;
        self.events.push(MotionEvent::Frozen { offset: at });
    }

    // -- Follow --

    /// Start following speech with `matcher`, from the current offset.
    pub fn start_follow(&mut self, matcher: Box<dyn StreamMatcher>) -> StartOutcome {
        self.stop(None);
        if !self.has_layout() {
            debug!("motion: follow start deferred, layout not ready");
            return StartOutcome::LayoutPending;
        }
        debug!(
            "motion: following from index {} ({:.3})",
            matcher.last_index(),
            matcher.progress()
        );
        self.matcher = Some(matcher);
        self.target = self.offset;
        self.set_mode(DriveMode::Follow);
        self.set_running(true);
        StartOutcome::Started
    }

    /// Stop following and discard the matcher.
    pub fn stop_follow(&mut self) {
        let following = self.mode == DriveMode::Follow
            || self.resume_after_touch == Some(Suspended::Follow)
            || matches!(self.paused, Some((Suspended::Follow, _, _)));
        if following {
            self.stop(None);
        }
    }

    /// Forward a transcript fragment to the active matcher.
    /// Ignored unless Follow is the active driver.
    pub fn feed_transcript(&mut self, fragment: &str) -> Option<f32> {
        if self.mode != DriveMode::Follow {
            return None;
        }
        let fraction = self.matcher.as_mut()?.feed(fragment)?;
        // Keep the spoken line just above the focus line
        self.target = -(self.content_extent * fraction) - self.line_height;
        self.events.push(MotionEvent::FollowTarget {
            fraction,
            target: self.target,
        });
        Some(fraction)
    }

    fn resync_matcher(&mut self) {
        let fraction = self.fraction_at_offset();
        if let Some(matcher) = self.matcher.as_mut() {
            matcher.resync(fraction);
            debug!("motion: matcher resynced to {:.3}", fraction);
        }
    }

    // -- Stop / pause --

    /// Stop every driver. The offset stays where it is.
    pub fn stop(&mut self, observed: Option<f32>) {
        self.countdown = None;
        self.freeze(observed);
        if self.matcher.take().is_some() {
            debug!("motion: matcher discarded");
        }
        self.manual = None;
        self.resume_after_touch = None;
        self.paused = None;
        self.target = self.offset;
        self.set_mode(DriveMode::Idle);
        self.set_running(false);
    }

    /// Hold the active automatic driver without discarding it.
    pub fn pause(&mut self) -> bool {
        let (driver, countdown) = match self.mode {
            DriveMode::Timed => {
                self.freeze(None);
                (Suspended::Timed, self.countdown.take())
            }
            DriveMode::Follow => (Suspended::Follow, None),
            DriveMode::Manual | DriveMode::Idle => return false,
        };
        self.target = self.offset;
        self.paused = Some((driver, self.offset, countdown));
        self.set_mode(DriveMode::Idle);
        self.set_running(false);
        true
    }

    /// Continue a paused driver from the current offset.
    ///
    /// A paused countdown picks up with the seconds it had left. A paused Follow
    /// keeps its matched index unless the offset moved while paused, in which
    /// case it resyncs to the new geometry.
    pub fn resume(&mut self) -> bool {
        if self.mode == DriveMode::Manual {
            return false;
        }
        let Some((driver, paused_at, countdown)) = self.paused.take() else {
            return false;
        };
        match driver {
            Suspended::Timed => match countdown {
                Some(countdown) => {
                    self.events.push(MotionEvent::CountdownTick(countdown.remaining()));
                    self.countdown = Some(countdown);
                    self.set_mode(DriveMode::Timed);
                    true
                }
                None => self.begin_transition() == StartOutcome::Started,
            },
            Suspended::Follow => {
                if self.matcher.is_none() {
                    return false;
                }
                if (self.offset - paused_at).abs() > self.config.dead_zone {
                    self.resync_matcher();
                }
                self.target = self.offset;
                self.set_mode(DriveMode::Follow);
                self.set_running(true);
                true
            }
        }
    }

    // -- Touch --

    /// A finger landed. Suspends the automatic driver.
    pub fn touch_start(&mut self, y: f32, t_ms: f64) {
        let suspended = match self.mode {
            DriveMode::Timed => {
                if self.countdown.take().is_some() {
                    debug!("motion: countdown cancelled by touch");
                    None
                } else {
                    self.freeze(None);
                    Some(Suspended::Timed)
                }
            }
            DriveMode::Follow => Some(Suspended::Follow),
            DriveMode::Manual => self.resume_after_touch,
            DriveMode::Idle => None,
        };
        self.resume_after_touch = suspended;
        self.manual = Some(ManualPhase::Dragging(DragTracker::new(y, t_ms)));
        self.target = self.offset;
        self.set_mode(DriveMode::Manual);
    }

    pub fn touch_move(&mut self, y: f32, t_ms: f64) {
        let Some(ManualPhase::Dragging(drag)) = self.manual.as_mut() else {
            return;
        };
        let dy = drag.sample(y, t_ms);
        if dy.is_finite() {
            self.offset += dy;
            self.target = self.offset;
        }
    }

    /// Finger lifted: coast, then hand back to the suspended driver.
    pub fn touch_end(&mut self, t_ms: f64) {
        let Some(ManualPhase::Dragging(drag)) = self.manual.as_ref() else {
            return;
        };
        let velocity = drag.release_velocity(t_ms, self.config.touch_idle_ms);
        let momentum = Momentum::new(
            velocity,
            self.config.momentum_decay,
            self.config.momentum_min_velocity,
            self.config.momentum_step_hz,
        );
        if momentum.is_settled() {
            self.settle();
        } else {
            debug!("motion: coasting at {:.0}px/s", velocity);
            self.manual = Some(ManualPhase::Coasting(momentum));
        }
    }

    fn settle(&mut self) {
        self.manual = None;
        self.target = self.offset;
        match self.resume_after_touch.take() {
            Some(Suspended::Timed) => {
                self.begin_transition();
            }
            Some(Suspended::Follow) => {
                self.resync_matcher();
                self.set_mode(DriveMode::Follow);
            }
            None => self.set_mode(DriveMode::Idle),
        }
    }

    // -- Frame --

    /// Advance by `dt` seconds. Stale ticks against a stopped driver are no-ops.
    pub fn tick(&mut self, dt: f32) -> MotionFrame {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.mode {
            DriveMode::Timed => self.tick_timed(dt),
            DriveMode::Follow => {
                self.offset = approach(
                    self.offset,
                    self.target,
                    self.config.follow_ease_rate,
                    dt,
                    self.config.dead_zone,
                );
            }
            DriveMode::Manual => {
                let settled = match self.manual.as_mut() {
                    Some(ManualPhase::Coasting(momentum)) => {
                        self.offset += momentum.tick(dt);
                        self.target = self.offset;
                        momentum.is_settled()
                    }
                    _ => false,
                };
                if settled {
                    self.settle();
                }
            }
            DriveMode::Idle => {}
        }
        self.frame()
    }

    fn tick_timed(&mut self, dt: f32) {
        if let Some(step) = self.countdown.as_mut().map(|c| c.tick(dt)) {
            match step {
                CountdownStep::Waiting => {}
                CountdownStep::Tick(n) => self.events.push(MotionEvent::CountdownTick(n)),
                CountdownStep::Done => {
                    self.countdown = None;
                    self.events.push(MotionEvent::CountdownTick(0));
                    self.begin_transition();
                }
            }
            return;
        }

        let done = match self.transition.as_mut() {
            Some(transition) => {
                self.offset = transition.advance(dt);
                transition.is_complete()
            }
            None => false,
        };
        if done {
            self.transition = None;
            self.target = self.offset;
            self.events.push(MotionEvent::Finished);
            info!("motion: timed scroll finished");
            self.set_mode(DriveMode::Idle);
            self.set_running(false);
        }
    }

    fn set_mode(&mut self, mode: DriveMode) {
        if self.mode != mode {
            debug!("motion: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.events.push(MotionEvent::ModeChanged(mode));
        }
    }

    fn set_running(&mut self, running: bool) {
        if self.running != running {
            self.running = running;
            self.events.push(MotionEvent::Running(running));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatcherConfig;

    const FRAME: f32 = 1.0 / 60.0;

    fn controller() -> MotionController {
        let mut c = MotionController::new(MotionConfig::default());
        c.set_layout(1000.0, 600.0);
        c
    }

    fn run(c: &mut MotionController, seconds: f32) {
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            c.tick(FRAME);
        }
    }

    fn matcher() -> Box<dyn StreamMatcher> {
        MatcherConfig { window: 10, ..MatcherConfig::default() }.build("ABCDEFGHIJ", 0.0)
    }

    fn started_transition(events: &[MotionEvent]) -> Option<TransitionSpec> {
        events.iter().rev().find_map(|e| match e {
            MotionEvent::TransitionStarted(spec) => Some(*spec),
            _ => None,
        })
    }

    #[test]
    fn timed_speed_sets_target_and_duration() {
        let mut c = controller();
        assert_eq!(c.start_timed(Pace::Speed(5.0), 0), StartOutcome::Started);
        assert_eq!(c.target(), -1000.0);
        assert!(c.is_running());
        let spec = started_transition(&c.drain_events()).unwrap();
        assert_eq!(spec.to, -1000.0);
        assert!((spec.duration - 20.0).abs() < 1e-4, "duration {}", spec.duration);
    }

    #[test]
    fn wpm_pace_is_proportional_to_remaining_distance() {
        let config = MotionConfig::default();
        let pace = Pace::Wpm { wpm: 150.0, units: 300 };
        assert!((pace.duration(1000.0, 1000.0, &config) - 120.0).abs() < 1e-3);
        assert!((pace.duration(500.0, 1000.0, &config) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn stop_mid_transition_freezes_at_interpolated_offset() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 5.0);
        c.stop_timed(None);
        assert!((c.offset() + 250.0).abs() < 0.5, "offset {}", c.offset());
        assert_eq!(c.target(), c.offset());
        assert_eq!(c.mode(), DriveMode::Idle);
        assert!(!c.is_running());
        assert!(c.transition().is_none());

        // Further ticks do not move a stopped scroll
        let frozen = c.offset();
        run(&mut c, 1.0);
        assert_eq!(c.offset(), frozen);
    }

    #[test]
    fn stop_prefers_observed_offset() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 1.0);
        c.stop_timed(Some(-51.5));
        assert_eq!(c.offset(), -51.5);
        assert!(c.drain_events().contains(&MotionEvent::Frozen { offset: -51.5 }));
    }

    #[test]
    fn countdown_gates_the_transition() {
        let mut c = controller();
        assert_eq!(c.start_timed(Pace::Speed(5.0), 3), StartOutcome::CountingDown(3));
        assert!(!c.is_running());
        run(&mut c, 2.5);
        assert_eq!(c.offset(), 0.0);
        assert_eq!(c.countdown(), Some(1));
        run(&mut c, 0.6);
        assert!(c.is_running());
        assert!(c.transition().is_some());

        let ticks: Vec<u32> = c
            .drain_events()
            .iter()
            .filter_map(|e| match e {
                MotionEvent::CountdownTick(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![3, 2, 1, 0]);
    }

    #[test]
    fn stop_cancels_countdown() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 3);
        run(&mut c, 1.0);
        c.stop(None);
        run(&mut c, 5.0);
        assert_eq!(c.offset(), 0.0);
        assert_eq!(c.countdown(), None);
        assert!(!c.is_running());
    }

    #[test]
    fn unmeasured_layout_is_pending_not_running() {
        let mut c = MotionController::new(MotionConfig::default());
        assert_eq!(c.start_timed(Pace::Speed(5.0), 0), StartOutcome::LayoutPending);
        assert_eq!(c.start_follow(matcher()), StartOutcome::LayoutPending);
        assert!(!c.is_running());
        assert!(!c.has_matcher());
        assert_eq!(c.mode(), DriveMode::Idle);
    }

    #[test]
    fn finished_scroll_cannot_restart() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 21.0);
        assert_eq!(c.offset(), -1000.0);
        assert_eq!(c.mode(), DriveMode::Idle);
        assert!(c.drain_events().contains(&MotionEvent::Finished));
        assert_eq!(c.start_timed(Pace::Speed(5.0), 0), StartOutcome::AtEnd);
        assert!(!c.is_running());
    }

    #[test]
    fn follow_eases_to_matched_target() {
        let mut c = controller();
        c.set_line_height(64.0);
        c.start_follow(matcher());
        assert_eq!(c.feed_transcript("ABC"), Some(0.3));
        assert!((c.target() + 364.0).abs() < 1e-3);

        c.tick(FRAME);
        let first = c.offset();
        assert!(first < 0.0 && first > -364.0, "eases, no jump: {}", first);

        run(&mut c, 2.0);
        assert_eq!(c.offset(), c.target());
    }

    #[test]
    fn follow_manual_round_trip_lands_at_release_offset() {
        let mut c = controller();
        c.set_line_height(64.0);
        c.start_follow(matcher());
        c.feed_transcript("ABC");
        run(&mut c, 2.0);

        c.touch_start(500.0, 0.0);
        assert_eq!(c.mode(), DriveMode::Manual);
        // Matcher is suspended while the finger is down
        assert_eq!(c.feed_transcript("DEF"), None);
        c.touch_move(480.0, 16.0);
        c.touch_move(460.0, 32.0);
        let released_at = c.offset();
        c.touch_end(1000.0);

        assert_eq!(c.mode(), DriveMode::Follow);
        assert!((c.target() - released_at).abs() < 1.0);
        run(&mut c, 1.0);
        assert!((c.offset() - released_at).abs() < 1.0);

        // Resynced to the dragged-to position, so the next phrase continues from there
        let p = c.feed_transcript("DEF").unwrap();
        assert!((p - 0.6).abs() < 1e-6);
    }

    #[test]
    fn momentum_settles_then_resumes_follow() {
        let mut c = controller();
        c.set_line_height(64.0);
        c.start_follow(matcher());

        c.touch_start(500.0, 0.0);
        c.touch_move(470.0, 16.0);
        c.touch_move(440.0, 32.0);
        c.touch_end(40.0);
        assert_eq!(c.mode(), DriveMode::Manual, "fast release should coast");

        run(&mut c, 3.0);
        assert_eq!(c.mode(), DriveMode::Follow);
        assert!(c.offset() < -60.0);
        assert_eq!(c.target(), c.offset());
    }

    #[test]
    fn touch_suspends_timed_and_resumes_from_new_offset() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 2.0);
        c.drain_events();

        c.touch_start(300.0, 0.0);
        let held = c.offset();
        run(&mut c, 1.0);
        assert_eq!(c.offset(), held, "timed driver must not move during a touch");

        c.touch_move(250.0, 16.0);
        c.touch_end(500.0);
        assert_eq!(c.mode(), DriveMode::Timed);
        let spec = started_transition(&c.drain_events()).unwrap();
        assert!((spec.from - (held - 50.0)).abs() < 1e-3);
        let expected = (1000.0 + spec.from) / 50.0;
        assert!((spec.duration - expected).abs() < 1e-3);
    }

    #[test]
    fn switching_to_timed_discards_matcher() {
        let mut c = controller();
        c.start_follow(matcher());
        assert!(c.has_matcher());
        c.start_timed(Pace::Speed(5.0), 0);
        assert!(!c.has_matcher());

        let target = c.target();
        assert_eq!(c.feed_transcript("ABC"), None);
        assert_eq!(c.target(), target);
    }

    #[test]
    fn stop_follow_ignores_later_fragments() {
        let mut c = controller();
        c.start_follow(matcher());
        c.stop_follow();
        assert_eq!(c.feed_transcript("ABC"), None);
        let frame = c.tick(FRAME);
        assert_eq!(frame.offset, 0.0);
        assert_eq!(frame.mode, DriveMode::Idle);
    }

    #[test]
    fn pause_and_resume_follow_keeps_index() {
        let mut c = controller();
        c.start_follow(matcher());
        c.feed_transcript("ABC");
        run(&mut c, 2.0);
        assert!(c.pause());
        assert!(!c.is_running());
        assert_eq!(c.feed_transcript("DEF"), None);
        assert!(c.resume());
        assert_eq!(c.matcher_progress(), Some(0.3));
        assert_eq!(c.feed_transcript("DEF"), Some(0.6));
    }

    #[test]
    fn pause_and_resume_timed() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 4.0);
        assert!(c.pause());
        let held = c.offset();
        run(&mut c, 2.0);
        assert_eq!(c.offset(), held);
        assert!(c.resume());
        run(&mut c, 1.0);
        assert!(c.offset() < held);
    }

    #[test]
    fn pause_during_countdown_keeps_remaining_seconds() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 3);
        run(&mut c, 0.5);
        assert!(c.pause());
        run(&mut c, 5.0);
        assert_eq!(c.offset(), 0.0);
        assert!(c.transition().is_none());

        assert!(c.resume());
        assert_eq!(c.countdown(), Some(3));
        assert!(!c.is_running());
        assert!(c.transition().is_none());
        run(&mut c, 2.4);
        assert!(c.transition().is_none(), "scroll must wait for zero");
        assert_eq!(c.countdown(), Some(1));
        run(&mut c, 0.2);
        assert!(c.is_running());
        assert!(c.transition().is_some());
    }

    #[test]
    fn wpm_without_reading_units_never_moves() {
        let mut c = controller();
        let pace = Pace::Wpm { wpm: 150.0, units: 0 };
        assert_eq!(c.start_timed(pace, 0), StartOutcome::AtEnd);
        c.tick(FRAME);
        assert_eq!(c.offset(), 0.0);
        assert_eq!(c.mode(), DriveMode::Idle);
        assert!(!c.is_running());
        assert!(c.transition().is_none());
    }

    #[test]
    fn zero_viewport_is_pending() {
        let mut c = MotionController::new(MotionConfig::default());
        c.set_layout(1000.0, 0.0);
        assert_eq!(c.start_timed(Pace::Speed(5.0), 0), StartOutcome::LayoutPending);
        assert_eq!(c.start_follow(matcher()), StartOutcome::LayoutPending);
        assert!(!c.is_running());
    }

    #[test]
    fn touch_during_countdown_cancels_it_for_good() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 3);
        run(&mut c, 1.0);
        c.touch_start(300.0, 0.0);
        assert_eq!(c.countdown(), None);
        c.touch_end(1000.0);
        assert_eq!(c.mode(), DriveMode::Idle);

        run(&mut c, 5.0);
        assert_eq!(c.offset(), 0.0);
        assert!(!c.is_running());
        assert_eq!(c.countdown(), None);
        assert!(c.transition().is_none());
        assert!(!c.resume());
    }

    #[test]
    fn transition_remaining_counts_down() {
        let mut c = controller();
        assert_eq!(c.transition_remaining(), 0.0);
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 5.0);
        assert!((c.transition_remaining() - 15.0).abs() < 0.05);
    }

    #[test]
    fn layout_change_reaims_timed_scroll() {
        let mut c = controller();
        c.start_timed(Pace::Speed(5.0), 0);
        run(&mut c, 2.0);
        c.set_layout(2000.0, 600.0);
        assert_eq!(c.target(), -2000.0);
        assert_eq!(c.mode(), DriveMode::Timed);
    }
}
