//! 应用层错误定义
//!
//! 统一的命令错误类型，每个变体都会带着可读信息到达 HTTP 边界

use thiserror::Error;

use crate::application::ports::{TranscodeError, VoiceCustomizationError};
use crate::domain::synthesis::SynthesisError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 缺少必填字段或字段非法
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 没有可用的访问凭证
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// 音色创建接口返回失败
    #[error("Remote call failed: {status} {message}")]
    RemoteCallError { status: u16, message: String },

    /// 采样率不在编码表中
    #[error("Unsupported sample_rate {0}")]
    UnsupportedSampleRate(u32),

    /// 流式连接失败、中断或超时
    #[error("Transport error: {0}")]
    TransportError(String),

    /// 合成流上报的远端错误
    #[error("Realtime synthesis failed: {0}")]
    RemoteSynthesisError(String),

    /// 会话成功结束但没有音频
    #[error("No audio data received from realtime synthesis")]
    EmptyResult,

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建凭证错误
    pub fn credential(message: impl Into<String>) -> Self {
        Self::CredentialError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<SynthesisError> for ApplicationError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::UnsupportedSampleRate(rate) => Self::UnsupportedSampleRate(rate),
            SynthesisError::Transport(msg) => Self::TransportError(msg),
            SynthesisError::RemoteSynthesis(cause) => Self::RemoteSynthesisError(cause),
            SynthesisError::EmptyResult => Self::EmptyResult,
            e @ SynthesisError::InvalidTransition { .. } => Self::InternalError(e.to_string()),
        }
    }
}

impl From<VoiceCustomizationError> for ApplicationError {
    fn from(err: VoiceCustomizationError) -> Self {
        match err {
            VoiceCustomizationError::ServiceError { status, message } => {
                Self::RemoteCallError { status, message }
            }
            VoiceCustomizationError::Timeout => Self::RemoteCallError {
                status: 504,
                message: "Request timeout".to_string(),
            },
            other => Self::RemoteCallError {
                status: 502,
                message: other.to_string(),
            },
        }
    }
}

impl From<TranscodeError> for ApplicationError {
    fn from(err: TranscodeError) -> Self {
        match err {
            TranscodeError::InvalidSampleRate(rate) => {
                Self::ValidationError(format!("Invalid sample_rate {}", rate))
            }
            TranscodeError::InvalidInput(msg) => Self::InternalError(msg),
        }
    }
}
