pub mod protocol;

pub use protocol::{FrameBuffer, FrameHeader, ProtocolLayout};
