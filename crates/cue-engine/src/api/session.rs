// api/session.rs
//
// TeleprompterSession: one script, one motion controller, and the timers
// around them (layout retry, chrome auto-hide). Every host callback lands here;
// nothing moves except through these methods and `tick`.

use log::{debug, info, warn};

use super::error::Result;
use super::settings::{Settings, Tuning};
use super::types::{ScrollMode, SessionEvent};
use crate::bridge::protocol::{drive_mode_code, flag, scroll_mode_code, FrameSnapshot};
use crate::core::time::FixedTimestep;
use crate::input::{InputEvent, InputQueue};
use crate::matcher::TranscriptDelta;
use crate::motion::{DriveMode, MotionController, MotionEvent, MotionFrame, StartOutcome};
use crate::text::Script;

/// A start waiting for the first layout measurement.
struct PendingStart {
    attempts: u32,
    retry: FixedTimestep,
}

/// Auto-hide state for the host's controls.
#[derive(Debug, Default)]
struct Chrome {
    hidden: bool,
    idle: f32,
}

pub struct TeleprompterSession {
    script: Script,
    settings: Settings,
    tuning: Tuning,
    mode: ScrollMode,
    controller: MotionController,
    input: InputQueue,
    transcript: TranscriptDelta,
    pending: Option<PendingStart>,
    chrome: Chrome,
    layout_dirty: bool,
    events: Vec<SessionEvent>,
}

impl TeleprompterSession {
    pub fn new(script: &str, settings: Settings, tuning: Tuning) -> Self {
        let script = Script::new(script);
        info!(
            "session: script of {} chars, {} reading units",
            script.normalized_len(),
            script.reading_units()
        );
        let mut controller = MotionController::new(tuning.motion.clone());
        controller.set_line_height(settings.line_height_px());
        Self {
            script,
            settings,
            tuning,
            mode: ScrollMode::default(),
            controller,
            input: InputQueue::new(),
            transcript: TranscriptDelta::new(),
            pending: None,
            chrome: Chrome::default(),
            // Nothing measured yet
            layout_dirty: true,
            events: Vec::with_capacity(16),
        }
    }

    pub fn with_defaults(script: &str) -> Self {
        Self::new(script, Settings::default(), Tuning::default())
    }

    // -- Accessors --

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn offset(&self) -> f32 {
        self.controller.offset()
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Running, counting down, or waiting for layout to start.
    pub fn is_active(&self) -> bool {
        self.controller.is_running() || self.controller.countdown().is_some() || self.pending.is_some()
    }

    pub fn is_layout_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn chrome_hidden(&self) -> bool {
        self.chrome.hidden
    }

    /// Settings changed text metrics since the last `set_layout`.
    pub fn layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    /// Whether another tick can still change anything. When false the host may
    /// stop scheduling frames until the next callback.
    pub fn wants_frame(&self) -> bool {
        let c = &self.controller;
        self.is_active()
            || c.mode() == DriveMode::Manual
            || c.offset() != c.target()
            || !self.input.is_empty()
            || (self.mode == ScrollMode::Timed && !self.chrome.hidden)
    }

    // -- Layout & settings --

    pub fn set_layout(&mut self, content_extent: f32, viewport_extent: f32) {
        debug!("session: layout {}x{}", content_extent, viewport_extent);
        self.controller.set_layout(content_extent, viewport_extent);
        self.controller.set_line_height(self.settings.line_height_px());
        self.layout_dirty = false;
        self.pump();
    }

    /// Replace the settings. Rejected settings leave the current ones in place.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        if let Err(err) = settings.validate() {
            warn!("session: settings rejected: {}", err);
            return Err(err);
        }
        if self.settings.affects_layout(&settings) {
            self.layout_dirty = true;
            self.events.push(SessionEvent::LayoutDirty);
        }
        self.controller.set_line_height(settings.line_height_px());
        self.settings = settings;
        self.reset_chrome();
        Ok(())
    }

    pub fn update_settings_json(&mut self, json: &str) -> Result<()> {
        let settings = Settings::from_json(json)?;
        self.update_settings(settings)
    }

    /// Replace engine tuning. Matcher changes apply from the next Follow start.
    pub fn update_tuning(&mut self, tuning: Tuning) -> Result<()> {
        tuning.validate()?;
        self.controller.set_config(tuning.motion.clone());
        self.tuning = tuning;
        Ok(())
    }

    // -- Lifecycle --

    /// Switch scroll mode. Always a full stop first.
    pub fn select_mode(&mut self, mode: ScrollMode) {
        if self.mode == mode {
            return;
        }
        self.stop();
        self.mode = mode;
        info!("session: mode {:?}", mode);
        self.events.push(SessionEvent::ModeSelected(mode));
        self.reset_chrome();
    }

    /// Start the selected mode from the current offset.
    pub fn start(&mut self) -> StartOutcome {
        self.pending = None;
        self.reset_chrome();
        let outcome = self.try_start();
        if outcome == StartOutcome::LayoutPending {
            let retry_secs = self.tuning.session.layout_retry_ms / 1000.0;
            self.pending = Some(PendingStart {
                attempts: 0,
                retry: FixedTimestep::with_max_steps(retry_secs, 1),
            });
            self.events.push(SessionEvent::LayoutPending { attempt: 0 });
        }
        self.pump();
        outcome
    }

    fn try_start(&mut self) -> StartOutcome {
        let outcome = match self.mode {
            ScrollMode::Timed => {
                let pace = self.settings.pace.to_pace(self.script.reading_units());
                self.controller.start_timed(pace, self.settings.countdown_secs)
            }
            ScrollMode::Follow => {
                let fraction = self.controller.fraction_at_offset();
                let matcher = self.tuning.matcher.build(self.script.normalized(), fraction);
                self.transcript.reset();
                self.controller.start_follow(matcher)
            }
        };
        match outcome {
            StartOutcome::Started | StartOutcome::CountingDown(_) => {
                info!("session: started {:?}", self.mode);
                self.events.push(SessionEvent::Started(self.mode));
            }
            StartOutcome::AtEnd => debug!("session: already at the end"),
            StartOutcome::LayoutPending => {}
        }
        outcome
    }

    /// Stop everything. The offset stays where it is.
    pub fn stop(&mut self) {
        self.stop_with(None);
    }

    /// Stop, freezing at the offset the host actually displays.
    pub fn stop_at(&mut self, observed_offset: f32) {
        self.stop_with(Some(observed_offset));
    }

    fn stop_with(&mut self, observed: Option<f32>) {
        let was_active = self.is_active() || self.controller.is_paused();
        self.pending = None;
        self.controller.stop(observed);
        self.transcript.reset();
        if was_active {
            info!("session: stopped at {:.1}", self.controller.offset());
            self.events.push(SessionEvent::Stopped);
        }
        self.reset_chrome();
        self.pump();
    }

    /// Start when idle, stop otherwise. Returns whether the session is now active.
    pub fn toggle(&mut self) -> bool {
        if self.is_active() {
            self.stop();
        } else {
            self.start();
        }
        self.is_active()
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.controller.pause();
        if paused {
            self.events.push(SessionEvent::Paused);
        }
        self.reset_chrome();
        self.pump();
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.controller.resume();
        if resumed {
            self.events.push(SessionEvent::Resumed);
        }
        self.reset_chrome();
        self.pump();
        resumed
    }

    // -- Transcript --

    /// Match an incremental fragment now.
    pub fn feed_transcript(&mut self, fragment: &str) -> Option<f32> {
        let fraction = self.controller.feed_transcript(fragment);
        self.pump();
        fraction
    }

    /// Match the new tail of a recognizer's cumulative result.
    pub fn feed_cumulative(&mut self, cumulative: &str) -> Option<f32> {
        let fresh = self.transcript.delta(cumulative)?;
        self.feed_transcript(&fresh)
    }

    /// The recognizer restarted; its next cumulative result starts from empty.
    pub fn recognizer_restarted(&mut self) {
        debug!("session: recognizer restarted");
        self.transcript.reset();
    }

    // -- Touch --

    pub fn touch_start(&mut self, y: f32, t_ms: f64) {
        self.reset_chrome();
        // A touch during a pending start cancels it
        self.pending = None;
        self.controller.touch_start(y, t_ms);
        self.pump();
    }

    pub fn touch_move(&mut self, y: f32, t_ms: f64) {
        self.controller.touch_move(y, t_ms);
    }

    pub fn touch_end(&mut self, t_ms: f64) {
        self.reset_chrome();
        self.controller.touch_end(t_ms);
        self.pump();
    }

    // -- Frame --

    /// Queue input for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance one frame: drain queued input, retry a pending start, move.
    pub fn tick(&mut self, dt: f32) -> MotionFrame {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for event in self.input.drain() {
            self.dispatch(event);
        }
        self.tick_pending(dt);
        let frame = self.controller.tick(dt);
        self.pump();
        self.tick_chrome(dt);
        frame
    }

    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { y, t_ms } => self.touch_start(y, t_ms),
            InputEvent::PointerMove { y, t_ms } => self.touch_move(y, t_ms),
            InputEvent::PointerUp { t_ms } => self.touch_end(t_ms),
            InputEvent::Transcript { text } => {
                self.feed_transcript(&text);
            }
            InputEvent::TranscriptCumulative { text } => {
                self.feed_cumulative(&text);
            }
            InputEvent::RecognizerRestarted => self.recognizer_restarted(),
        }
    }

    fn tick_pending(&mut self, dt: f32) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.retry.accumulate(dt) == 0 {
            return;
        }
        pending.attempts += 1;
        let attempt = pending.attempts;

        match self.try_start() {
            StartOutcome::LayoutPending if attempt >= self.tuning.session.layout_retry_limit => {
                warn!("session: layout never measured, start abandoned after {} attempts", attempt);
                self.pending = None;
                self.events.push(SessionEvent::LayoutAbandoned);
            }
            StartOutcome::LayoutPending => {
                self.events.push(SessionEvent::LayoutPending { attempt });
            }
            _ => self.pending = None,
        }
    }

    /// Controls hide after a quiet spell in Timed mode while nothing runs.
    fn tick_chrome(&mut self, dt: f32) {
        let eligible = self.mode == ScrollMode::Timed && !self.is_active();
        if !eligible {
            self.show_chrome();
            return;
        }
        if self.chrome.hidden {
            return;
        }
        self.chrome.idle += dt;
        if self.chrome.idle >= self.tuning.session.chrome_hide_secs {
            self.chrome.hidden = true;
            self.events.push(SessionEvent::ChromeHidden(true));
        }
    }

    fn show_chrome(&mut self) {
        self.chrome.idle = 0.0;
        if self.chrome.hidden {
            self.chrome.hidden = false;
            self.events.push(SessionEvent::ChromeHidden(false));
        }
    }

    /// Any interaction.
    fn reset_chrome(&mut self) {
        self.show_chrome();
    }

    /// Forward controller notifications as session events.
    fn pump(&mut self) {
        for event in self.controller.drain_events() {
            let mapped = match event {
                MotionEvent::CountdownTick(n) => SessionEvent::CountdownTick(n),
                MotionEvent::TransitionStarted(spec) => SessionEvent::TransitionStarted(spec),
                MotionEvent::Frozen { offset } => SessionEvent::Frozen { offset },
                MotionEvent::Finished => SessionEvent::Finished,
                MotionEvent::FollowTarget { fraction, target } => {
                    SessionEvent::Progress { fraction, target }
                }
                MotionEvent::ModeChanged(mode) => SessionEvent::DriveChanged(mode),
                MotionEvent::Running(_) => continue,
            };
            self.events.push(mapped);
        }
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fraction of the script at the focus line.
    pub fn progress(&self) -> f32 {
        match self.controller.matcher_progress() {
            Some(progress) => progress,
            None => self.controller.fraction_at_offset(),
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let c = &self.controller;
        FrameSnapshot {
            offset: c.offset(),
            target: c.target(),
            transition_remaining: c.transition_remaining(),
            countdown: c.countdown().unwrap_or(0) as f32,
            running: flag(c.is_running()),
            drive_mode: drive_mode_code(c.mode()),
            scroll_mode: scroll_mode_code(self.mode),
            progress: self.progress(),
            chrome_hidden: flag(self.chrome.hidden),
            paused: flag(c.is_paused()),
            layout_dirty: flag(self.layout_dirty),
            layout_pending: flag(self.pending.is_some()),
        }
    }
}
