//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（RealtimeConnector、VoiceCustomization、AudioTranscoder）
//! - synthesis: 实时合成会话驱动与事件收集
//! - commands: 命令及处理器
//! - credentials / defaults: 请求凭证与缺省值
//! - error: 应用层错误定义

pub mod commands;
pub mod credentials;
pub mod defaults;
pub mod error;
pub mod ports;
pub mod synthesis;

// Re-exports
pub use commands::{
    handlers::{
        DesignVoiceHandler, DesignVoiceResponse, EnrollVoiceHandler, EnrollVoiceResponse,
        SynthesizeSpeechHandler,
    },
    DesignVoice, EnrollVoice, SynthesizeSpeech,
};

pub use credentials::CredentialResolver;
pub use defaults::RequestDefaults;
pub use error::ApplicationError;

pub use ports::{
    // Audio transcoder
    AudioFormat,
    AudioInfo,
    AudioTranscoderPort,
    EncodedAudio,
    TranscodeError,
    // Realtime synthesis
    ConnectRequest,
    RealtimeConnection,
    RealtimeConnectorPort,
    RealtimeError,
    // Voice customization
    DesignVoiceRequest,
    DesignedVoice,
    EnrollVoiceRequest,
    VoiceCustomizationError,
    VoiceCustomizationPort,
};

pub use synthesis::{
    CompletionOutcome, EventCollector, OutcomeWaiter, SessionDriver, SynthesisRequest,
    DEFAULT_COMPLETION_TIMEOUT,
};
