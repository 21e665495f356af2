//! Voice Customization Port - 音色创建抽象
//!
//! 声音设计和声音复刻都是一次同步的远端调用

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::{ApiKey, AudioSample};

/// 音色创建错误
#[derive(Debug, Error)]
pub enum VoiceCustomizationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    /// 远端返回非成功状态码
    #[error("HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 声音设计请求
#[derive(Debug, Clone)]
pub struct DesignVoiceRequest {
    pub api_key: ApiKey,
    /// 声音描述
    pub voice_prompt: String,
    /// 预览文本
    pub preview_text: String,
    pub preferred_name: String,
    pub language: String,
    /// 音色绑定的合成模型
    pub target_model: String,
    pub sample_rate: u32,
    /// 预览音频格式
    pub response_format: String,
}

/// 声音设计结果
#[derive(Debug, Clone)]
pub struct DesignedVoice {
    /// 远端分配的音色名称
    pub voice: String,
    /// 预览音频（base64）
    pub preview_audio_base64: Option<String>,
}

/// 声音复刻请求
#[derive(Debug, Clone)]
pub struct EnrollVoiceRequest {
    pub api_key: ApiKey,
    pub sample: AudioSample,
    pub preferred_name: String,
    pub target_model: String,
}

/// Voice Customization Port
#[async_trait]
pub trait VoiceCustomizationPort: Send + Sync {
    /// 根据文字描述设计一个新音色
    async fn design_voice(
        &self,
        request: DesignVoiceRequest,
    ) -> Result<DesignedVoice, VoiceCustomizationError>;

    /// 根据样本音频复刻音色，返回音色名称
    async fn enroll_voice(
        &self,
        request: EnrollVoiceRequest,
    ) -> Result<String, VoiceCustomizationError>;
}
