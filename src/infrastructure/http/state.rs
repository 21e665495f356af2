//! Application State
//!
//! 持有三个用例处理器，由路由共享

use std::sync::Arc;

use crate::application::{
    AudioTranscoderPort, CredentialResolver, DesignVoiceHandler, EnrollVoiceHandler,
    RequestDefaults, SessionDriver, SynthesizeSpeechHandler, VoiceCustomizationPort,
};

/// 应用状态
pub struct AppState {
    /// 是否配置了进程级凭证
    pub api_key_configured: bool,
    /// 实时合成支持的采样率
    pub sample_rates: Vec<u32>,

    pub design_voice_handler: DesignVoiceHandler,
    pub enroll_voice_handler: EnrollVoiceHandler,
    pub synthesize_speech_handler: SynthesizeSpeechHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        voice_client: Arc<dyn VoiceCustomizationPort>,
        session_driver: Arc<SessionDriver>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        credentials: CredentialResolver,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            api_key_configured: credentials.has_configured_key(),
            sample_rates: session_driver.encodings().sample_rates(),

            design_voice_handler: DesignVoiceHandler::new(
                voice_client.clone(),
                credentials.clone(),
                defaults.clone(),
            ),
            enroll_voice_handler: EnrollVoiceHandler::new(
                voice_client,
                credentials.clone(),
                defaults.clone(),
            ),
            synthesize_speech_handler: SynthesizeSpeechHandler::new(
                session_driver,
                transcoder,
                credentials,
                defaults,
            ),
        }
    }
}
