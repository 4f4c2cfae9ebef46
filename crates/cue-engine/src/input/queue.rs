/// Input the session understands.
/// Host callbacks push these; the session drains them at the start of each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A finger or button went down at vertical position `y` (px), at `t_ms`.
    PointerDown { y: f32, t_ms: f64 },
    /// The pointer moved while down.
    PointerMove { y: f32, t_ms: f64 },
    /// The pointer was released.
    PointerUp { t_ms: f64 },
    /// An incremental transcript fragment.
    Transcript { text: String },
    /// A recognizer's full result so far; only the new tail is matched.
    TranscriptCumulative { text: String },
    /// The recognizer restarted and its cumulative result starts over.
    RecognizerRestarted,
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
