//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_transcoder;
mod realtime_synthesis;
mod voice_customization;

pub use audio_transcoder::{
    AudioFormat, AudioInfo, AudioTranscoderPort, EncodedAudio, TranscodeError,
};
pub use realtime_synthesis::{
    ConnectRequest, RealtimeConnection, RealtimeConnectorPort, RealtimeError,
};
pub use voice_customization::{
    DesignVoiceRequest, DesignedVoice, EnrollVoiceRequest, VoiceCustomizationError,
    VoiceCustomizationPort,
};
