//! Data Transfer Objects
//!
//! 请求字段全部可选，缺失和空白由命令处理器统一校验

use serde::{Deserialize, Serialize};

use crate::application::{DesignVoice, EncodedAudio, SynthesizeSpeech};

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DesignVoiceRequest {
    pub api_key: Option<String>,
    pub voice_prompt: Option<String>,
    pub preview_text: Option<String>,
    pub preferred_name: Option<String>,
    pub language: Option<String>,
    pub target_model: Option<String>,
    pub sample_rate: Option<u32>,
    pub response_format: Option<String>,
}

impl From<DesignVoiceRequest> for DesignVoice {
    fn from(req: DesignVoiceRequest) -> Self {
        Self {
            api_key: req.api_key,
            voice_prompt: req.voice_prompt,
            preview_text: req.preview_text,
            preferred_name: req.preferred_name,
            language: req.language,
            target_model: req.target_model,
            sample_rate: req.sample_rate,
            response_format: req.response_format,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DesignVoiceResponse {
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_audio_base64: Option<String>,
    pub preview_audio_format: String,
}

#[derive(Debug, Serialize)]
pub struct EnrollVoiceResponse {
    pub voice: String,
}

// ============================================================================
// TTS DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TtsRequest {
    pub api_key: Option<String>,
    pub voice: Option<String>,
    pub text: Option<String>,
    pub model: Option<String>,
    pub sample_rate: Option<u32>,
    /// `wav` 或 `pcm`
    pub format: Option<String>,
}

impl From<TtsRequest> for SynthesizeSpeech {
    fn from(req: TtsRequest) -> Self {
        Self {
            api_key: req.api_key,
            voice: req.voice,
            text: req.text,
            model: req.model,
            sample_rate: req.sample_rate,
            format: req.format,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TtsResponse {
    pub audio_base64: String,
    pub mime_type: &'static str,
}

impl From<EncodedAudio> for TtsResponse {
    fn from(audio: EncodedAudio) -> Self {
        use base64::prelude::*;

        Self {
            mime_type: audio.mime_type(),
            audio_base64: BASE64_STANDARD.encode(&audio.audio_data),
        }
    }
}
