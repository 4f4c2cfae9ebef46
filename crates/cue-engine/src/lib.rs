pub mod api;
pub mod bridge;
pub mod core;
pub mod input;
pub mod matcher;
pub mod motion;
pub mod text;

// Re-export key types at crate root for convenience
pub use api::{
    ScrollMode, ScrollPace, SessionConfig, SessionEvent, Settings, SettingsError,
    TeleprompterSession, TextAlign, Tuning,
};
pub use bridge::protocol::{EventRecord, FrameSnapshot, ProtocolLayout, PROTOCOL_VERSION};
pub use core::time::{FixedTimestep, FrameClock};
pub use input::queue::{InputEvent, InputQueue};
pub use matcher::{
    AnchorMatcher, FuzzyMatcher, MatchCursor, MatcherConfig, MatcherStrategy, StreamMatcher,
    TranscriptDelta,
};
pub use motion::{
    DriveMode, Easing, MotionConfig, MotionController, MotionEvent, MotionFrame, Pace,
    StartOutcome, TransitionSpec,
};
pub use text::{normalize, Script};
