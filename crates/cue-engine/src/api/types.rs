use serde::{Deserialize, Serialize};

use crate::motion::{DriveMode, TransitionSpec};

/// The scroll mode a session starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    /// Scroll to the end at a configured pace.
    #[default]
    Timed,
    /// Follow the speaker's voice.
    Follow,
}

/// Something the host should react to.
/// Drained once per frame via `TeleprompterSession::drain_events`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    ModeSelected(ScrollMode),
    Started(ScrollMode),
    Stopped,
    Paused,
    Resumed,
    /// Seconds left before a timed scroll starts; 0 when it starts.
    CountdownTick(u32),
    /// A timed transition the host may animate natively.
    TransitionStarted(TransitionSpec),
    /// Timed motion froze at this offset.
    Frozen { offset: f32 },
    /// A timed scroll reached the end.
    Finished,
    /// The matcher moved forward.
    Progress { fraction: f32, target: f32 },
    DriveChanged(DriveMode),
    /// Start deferred until layout is measured.
    LayoutPending { attempt: u32 },
    /// Layout never arrived; start abandoned.
    LayoutAbandoned,
    ChromeHidden(bool),
    /// Settings changed in a way that needs a new measurement.
    LayoutDirty,
}
