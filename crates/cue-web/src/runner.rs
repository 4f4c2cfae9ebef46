use cue_engine::{
    EventRecord, FrameClock, FrameSnapshot, InputEvent, ProtocolLayout, Settings,
    TeleprompterSession, Tuning,
};

/// Drives one session from the host's frame callbacks.
///
/// `lib.rs` keeps the session's runner in a `thread_local!` so the host
/// calls plain `#[wasm_bindgen]` free functions instead of holding a handle.
pub struct SessionRunner {
    session: TeleprompterSession,
    clock: FrameClock,
    layout: ProtocolLayout,
    /// Flat frame buffer the host reads after each tick.
    buffer: Vec<f32>,
    frame_counter: u32,
    event_count: usize,
}

impl SessionRunner {
    pub fn new(script: &str, settings: Settings, tuning: Tuning, max_events: usize) -> Self {
        let layout = ProtocolLayout::new(max_events);
        let mut runner = Self {
            session: TeleprompterSession::new(script, settings, tuning),
            clock: FrameClock::new(),
            buffer: Vec::with_capacity(layout.buffer_total_floats),
            layout,
            frame_counter: 0,
            event_count: 0,
        };
        runner.publish();
        runner
    }

    pub fn session(&self) -> &TeleprompterSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TeleprompterSession {
        &mut self.session
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.session.push_input(event);
    }

    /// Tick from a host timestamp (animation frame or fallback timer).
    /// Returns whether the host should schedule another frame.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let dt = self.clock.delta(now_ms);
        self.tick(dt)
    }

    /// Tick by an explicit delta in seconds.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.session.tick(dt);
        self.publish();

        let wants = self.session.wants_frame();
        if !wants {
            // Next frame after a quiet spell must not see the gap as elapsed time
            self.clock.reset();
        }
        wants
    }

    /// Flush events raised outside a tick (start, stop, settings) into the buffer.
    pub fn publish(&mut self) {
        let records: Vec<EventRecord> = self
            .session
            .drain_events()
            .iter()
            .map(EventRecord::from_event)
            .collect();
        if records.len() > self.layout.max_events {
            log::warn!(
                "runner: {} events exceed capacity {}, dropping the rest",
                records.len(),
                self.layout.max_events
            );
        }
        let snapshot = self.session.snapshot();
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.event_count =
            self.layout
                .write_frame(&mut self.buffer, self.frame_counter, &snapshot, &records);
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.session.snapshot()
    }

    // ---- Buffer accessors for host reads ----

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn event_count(&self) -> u32 {
        self.event_count as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }
}
