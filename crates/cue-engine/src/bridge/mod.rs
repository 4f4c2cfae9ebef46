pub mod protocol;

pub use protocol::{EventRecord, FrameSnapshot, ProtocolLayout, PROTOCOL_VERSION};
