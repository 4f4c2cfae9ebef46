pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use cue_engine::{InputEvent, ScrollMode, Settings, StartOutcome, Tuning};
use wasm_bindgen::prelude::*;

/// Event records kept per frame.
const MAX_EVENTS: usize = 32;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner; `None` (logged) before `cue_init`.
fn try_with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> Option<R> {
    let out = RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f));
    if out.is_none() {
        log::error!("cue: session not initialized, call cue_init() first");
    }
    out
}

fn with_runner<R: Default>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    try_with_runner(f).unwrap_or_default()
}

fn start_outcome_code(outcome: StartOutcome) -> i32 {
    match outcome {
        StartOutcome::Started => 0,
        StartOutcome::CountingDown(n) => n as i32,
        StartOutcome::LayoutPending => -1,
        StartOutcome::AtEnd => -2,
    }
}

/// Create the session. Empty or invalid JSON falls back to defaults.
#[wasm_bindgen]
pub fn cue_init(script: &str, settings_json: &str, tuning_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let settings = if settings_json.trim().is_empty() {
        Settings::default()
    } else {
        Settings::from_json(settings_json).unwrap_or_else(|err| {
            log::warn!("cue: {}, using default settings", err);
            Settings::default()
        })
    };
    let tuning = if tuning_json.trim().is_empty() {
        Tuning::default()
    } else {
        Tuning::from_json(tuning_json).unwrap_or_else(|err| {
            log::warn!("cue: {}, using default tuning", err);
            Tuning::default()
        })
    };

    let runner = SessionRunner::new(script, settings, tuning, MAX_EVENTS);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("cue: initialized");
}

// ---- Frame ----

/// Tick from a `requestAnimationFrame` or fallback-timer timestamp.
/// Returns whether another frame should be scheduled.
#[wasm_bindgen]
pub fn cue_frame(now_ms: f64) -> bool {
    with_runner(|r| r.frame(now_ms))
}

#[wasm_bindgen]
pub fn cue_tick(dt: f32) -> bool {
    with_runner(|r| r.tick(dt))
}

/// Fallback timer period when no display refresh is available.
#[wasm_bindgen]
pub fn cue_fallback_interval_ms() -> f64 {
    cue_engine::FrameClock::fallback_interval_ms()
}

// ---- Lifecycle ----

#[wasm_bindgen]
pub fn cue_set_layout(content_extent: f32, viewport_extent: f32) {
    with_runner(|r| {
        r.session_mut().set_layout(content_extent, viewport_extent);
        r.publish();
    })
}

/// 0 = timed, 1 = follow.
#[wasm_bindgen]
pub fn cue_select_mode(mode: u32) {
    let mode = if mode == 1 { ScrollMode::Follow } else { ScrollMode::Timed };
    with_runner(|r| {
        r.session_mut().select_mode(mode);
        r.publish();
    })
}

/// 0 started, >0 countdown seconds, -1 layout pending (retrying), -2 already at end.
#[wasm_bindgen]
pub fn cue_start() -> i32 {
    with_runner(|r| {
        let outcome = r.session_mut().start();
        r.publish();
        start_outcome_code(outcome)
    })
}

#[wasm_bindgen]
pub fn cue_stop() {
    with_runner(|r| {
        r.session_mut().stop();
        r.publish();
    })
}

/// Stop at the offset the host is actually showing.
#[wasm_bindgen]
pub fn cue_stop_at(observed_offset: f32) {
    with_runner(|r| {
        r.session_mut().stop_at(observed_offset);
        r.publish();
    })
}

#[wasm_bindgen]
pub fn cue_toggle() -> bool {
    with_runner(|r| {
        let active = r.session_mut().toggle();
        r.publish();
        active
    })
}

#[wasm_bindgen]
pub fn cue_pause() -> bool {
    with_runner(|r| {
        let paused = r.session_mut().pause();
        r.publish();
        paused
    })
}

#[wasm_bindgen]
pub fn cue_resume() -> bool {
    with_runner(|r| {
        let resumed = r.session_mut().resume();
        r.publish();
        resumed
    })
}

// ---- Input (queued, applied on the next tick) ----

#[wasm_bindgen]
pub fn cue_pointer_down(y: f32, t_ms: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { y, t_ms }));
}

#[wasm_bindgen]
pub fn cue_pointer_move(y: f32, t_ms: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { y, t_ms }));
}

#[wasm_bindgen]
pub fn cue_pointer_up(t_ms: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { t_ms }));
}

#[wasm_bindgen]
pub fn cue_transcript(text: &str) {
    with_runner(|r| r.push_input(InputEvent::Transcript { text: text.to_string() }));
}

#[wasm_bindgen]
pub fn cue_transcript_cumulative(text: &str) {
    with_runner(|r| {
        r.push_input(InputEvent::TranscriptCumulative {
            text: text.to_string(),
        })
    });
}

#[wasm_bindgen]
pub fn cue_recognizer_restarted() {
    with_runner(|r| r.push_input(InputEvent::RecognizerRestarted));
}

// ---- Settings ----

/// Apply settings JSON. Rejected settings are logged and leave the old ones in place.
#[wasm_bindgen]
pub fn cue_update_settings(json: &str) -> bool {
    with_runner(|r| {
        let applied = match r.session_mut().update_settings_json(json) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("cue: {}", err);
                false
            }
        };
        r.publish();
        applied
    })
}

#[wasm_bindgen]
pub fn cue_settings_json() -> String {
    with_runner(|r| {
        r.session().settings().to_json().unwrap_or_else(|err| {
            log::error!("cue: {}", err);
            String::new()
        })
    })
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(runner) => runner.buffer_ptr(),
        None => std::ptr::null(),
    })
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events())
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count())
}

/// Copy of the whole frame buffer, for hosts without shared memory access.
#[wasm_bindgen]
pub fn cue_frame_buffer() -> js_sys::Float32Array {
    try_with_runner(|r| js_sys::Float32Array::from(r.buffer()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn cue_snapshot() -> js_sys::Float32Array {
    try_with_runner(|r| js_sys::Float32Array::from(r.snapshot().as_floats()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}
