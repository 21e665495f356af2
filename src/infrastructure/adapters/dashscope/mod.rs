//! DashScope Adapter - 实时合成与音色创建客户端

mod messages;
mod realtime_client;
mod voice_client;

pub use realtime_client::DashscopeRealtimeConnector;
pub use voice_client::{DashscopeVoiceClient, DashscopeVoiceClientConfig};
