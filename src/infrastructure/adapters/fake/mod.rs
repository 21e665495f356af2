//! 测试替身

mod realtime;
mod voice;

pub use realtime::{ScriptStep, ScriptedRealtimeConnector};
pub use voice::RecordingVoiceClient;
