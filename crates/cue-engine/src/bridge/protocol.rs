//! Flat frame buffer shared with the host.
//! Must stay in sync with the host's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 4 floats]
//! [Snapshot: 12 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! The event capacity is written into the header so the host can size its view.

use bytemuck::{Pod, Zeroable};

use crate::api::types::{ScrollMode, SessionEvent};
use crate::motion::{DriveMode, Easing};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 4;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_EVENTS: usize = 2;
pub const HEADER_EVENT_COUNT: usize = 3;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Event kinds (wire format, never renumber).
pub mod event_kind {
    pub const MODE_SELECTED: f32 = 1.0;
    pub const STARTED: f32 = 2.0;
    pub const STOPPED: f32 = 3.0;
    pub const PAUSED: f32 = 4.0;
    pub const RESUMED: f32 = 5.0;
    pub const COUNTDOWN_TICK: f32 = 6.0;
    pub const TRANSITION_STARTED: f32 = 7.0;
    pub const FROZEN: f32 = 8.0;
    pub const FINISHED: f32 = 9.0;
    pub const PROGRESS: f32 = 10.0;
    pub const DRIVE_CHANGED: f32 = 11.0;
    pub const LAYOUT_PENDING: f32 = 12.0;
    pub const LAYOUT_ABANDONED: f32 = 13.0;
    pub const CHROME_HIDDEN: f32 = 14.0;
    pub const LAYOUT_DIRTY: f32 = 15.0;
}

pub fn drive_mode_code(mode: DriveMode) -> f32 {
    match mode {
        DriveMode::Idle => 0.0,
        DriveMode::Timed => 1.0,
        DriveMode::Follow => 2.0,
        DriveMode::Manual => 3.0,
    }
}

pub fn scroll_mode_code(mode: ScrollMode) -> f32 {
    match mode {
        ScrollMode::Timed => 0.0,
        ScrollMode::Follow => 1.0,
    }
}

pub fn easing_code(easing: Easing) -> f32 {
    match easing {
        Easing::Linear => 0.0,
        Easing::QuadIn => 1.0,
        Easing::QuadOut => 2.0,
        Easing::QuadInOut => 3.0,
        Easing::SineInOut => 4.0,
    }
}

pub(crate) fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Per-frame session state for the host.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameSnapshot {
    pub offset: f32,
    pub target: f32,
    /// Seconds left in the timed transition, 0 if none.
    pub transition_remaining: f32,
    /// Countdown seconds left, 0 if none.
    pub countdown: f32,
    pub running: f32,
    pub drive_mode: f32,
    pub scroll_mode: f32,
    /// Fraction of the script behind the focus line [0, 1].
    pub progress: f32,
    pub chrome_hidden: f32,
    pub paused: f32,
    pub layout_dirty: f32,
    pub layout_pending: f32,
}

impl FrameSnapshot {
    pub const FLOATS: usize = 12;

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

/// A session event flattened for the host: `kind` identifies it, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;

    fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }

    pub fn from_event(event: &SessionEvent) -> Self {
        use event_kind::*;
        match *event {
            SessionEvent::ModeSelected(mode) => Self::new(MODE_SELECTED, scroll_mode_code(mode), 0.0, 0.0),
            SessionEvent::Started(mode) => Self::new(STARTED, scroll_mode_code(mode), 0.0, 0.0),
            SessionEvent::Stopped => Self::new(STOPPED, 0.0, 0.0, 0.0),
            SessionEvent::Paused => Self::new(PAUSED, 0.0, 0.0, 0.0),
            SessionEvent::Resumed => Self::new(RESUMED, 0.0, 0.0, 0.0),
            SessionEvent::CountdownTick(n) => Self::new(COUNTDOWN_TICK, n as f32, 0.0, 0.0),
            // `from` is implied by the current offset; easing travels in `c`
            SessionEvent::TransitionStarted(spec) => {
                Self::new(TRANSITION_STARTED, spec.to, spec.duration, easing_code(spec.easing))
            }
            SessionEvent::Frozen { offset } => Self::new(FROZEN, offset, 0.0, 0.0),
            SessionEvent::Finished => Self::new(FINISHED, 0.0, 0.0, 0.0),
            SessionEvent::Progress { fraction, target } => Self::new(PROGRESS, fraction, target, 0.0),
            SessionEvent::DriveChanged(mode) => Self::new(DRIVE_CHANGED, drive_mode_code(mode), 0.0, 0.0),
            SessionEvent::LayoutPending { attempt } => Self::new(LAYOUT_PENDING, attempt as f32, 0.0, 0.0),
            SessionEvent::LayoutAbandoned => Self::new(LAYOUT_ABANDONED, 0.0, 0.0, 0.0),
            SessionEvent::ChromeHidden(hidden) => Self::new(CHROME_HIDDEN, flag(hidden), 0.0, 0.0),
            SessionEvent::LayoutDirty => Self::new(LAYOUT_DIRTY, 0.0, 0.0, 0.0),
        }
    }
}

/// Buffer layout for a given event capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_events: usize,
    /// Offset (in floats) where the snapshot begins.
    pub snapshot_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,
    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
}

impl ProtocolLayout {
    pub fn new(max_events: usize) -> Self {
        let snapshot_offset = HEADER_FLOATS;
        let event_data_offset = snapshot_offset + FrameSnapshot::FLOATS;
        Self {
            max_events,
            snapshot_offset,
            event_data_offset,
            buffer_total_floats: event_data_offset + max_events * EventRecord::FLOATS,
        }
    }

    /// Write one frame into `buf` (resized to fit). Events past capacity are dropped.
    /// Returns the number of events written.
    pub fn write_frame(
        &self,
        buf: &mut Vec<f32>,
        frame_counter: u32,
        snapshot: &FrameSnapshot,
        events: &[EventRecord],
    ) -> usize {
        buf.resize(self.buffer_total_floats, 0.0);
        let count = events.len().min(self.max_events);

        buf[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buf[HEADER_FRAME_COUNTER] = frame_counter as f32;
        buf[HEADER_MAX_EVENTS] = self.max_events as f32;
        buf[HEADER_EVENT_COUNT] = count as f32;

        buf[self.snapshot_offset..self.event_data_offset].copy_from_slice(snapshot.as_floats());

        let event_floats: &[f32] = bytemuck::cast_slice(&events[..count]);
        let start = self.event_data_offset;
        buf[start..start + event_floats.len()].copy_from_slice(event_floats);
        count
    }
}

impl Default for ProtocolLayout {
    fn default() -> Self {
        Self::new(32)
    }
}
