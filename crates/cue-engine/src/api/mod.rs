pub mod error;
pub mod session;
pub mod settings;
pub mod types;

pub use error::SettingsError;
pub use session::TeleprompterSession;
pub use settings::{ScrollPace, SessionConfig, Settings, TextAlign, Tuning};
pub use types::{ScrollMode, SessionEvent};
