//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::{DesignVoice, EnrollVoice};
use crate::application::credentials::CredentialResolver;
use crate::application::defaults::{non_blank, or_default, rate_or_default, RequestDefaults};
use crate::application::error::ApplicationError;
use crate::application::ports::{DesignVoiceRequest, EnrollVoiceRequest, VoiceCustomizationPort};
use crate::domain::voice::AudioSample;

// ============================================================================
// DesignVoice
// ============================================================================

/// 声音设计响应
#[derive(Debug, Clone)]
pub struct DesignVoiceResponse {
    pub voice: String,
    pub preview_audio_base64: Option<String>,
    pub preview_audio_format: String,
}

/// DesignVoice Handler
pub struct DesignVoiceHandler {
    voice_client: Arc<dyn VoiceCustomizationPort>,
    credentials: CredentialResolver,
    defaults: RequestDefaults,
}

impl DesignVoiceHandler {
    pub fn new(
        voice_client: Arc<dyn VoiceCustomizationPort>,
        credentials: CredentialResolver,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            voice_client,
            credentials,
            defaults,
        }
    }

    pub async fn handle(&self, command: DesignVoice) -> Result<DesignVoiceResponse, ApplicationError> {
        let api_key = self.credentials.resolve(command.api_key.as_deref())?;

        let voice_prompt = non_blank(command.voice_prompt.as_deref())
            .ok_or_else(|| ApplicationError::validation("voice_prompt is required"))?
            .to_string();
        let preview_text = non_blank(command.preview_text.as_deref())
            .ok_or_else(|| ApplicationError::validation("preview_text is required"))?
            .to_string();
        let response_format = or_default(
            command.response_format.as_deref(),
            &self.defaults.response_format,
        );

        let request = DesignVoiceRequest {
            api_key,
            voice_prompt,
            preview_text,
            preferred_name: or_default(command.preferred_name.as_deref(), ""),
            language: or_default(command.language.as_deref(), &self.defaults.language),
            target_model: or_default(command.target_model.as_deref(), &self.defaults.design_model),
            sample_rate: rate_or_default(command.sample_rate, self.defaults.sample_rate),
            response_format: response_format.clone(),
        };

        tracing::debug!(
            target_model = %request.target_model,
            language = %request.language,
            sample_rate = request.sample_rate,
            "Designing voice"
        );

        let designed = self.voice_client.design_voice(request).await?;

        tracing::info!(
            voice = %designed.voice,
            has_preview = designed.preview_audio_base64.is_some(),
            "Voice designed"
        );

        Ok(DesignVoiceResponse {
            voice: designed.voice,
            preview_audio_base64: designed.preview_audio_base64,
            preview_audio_format: response_format,
        })
    }
}

// ============================================================================
// EnrollVoice
// ============================================================================

/// 声音复刻响应
#[derive(Debug, Clone)]
pub struct EnrollVoiceResponse {
    pub voice: String,
}

/// EnrollVoice Handler
pub struct EnrollVoiceHandler {
    voice_client: Arc<dyn VoiceCustomizationPort>,
    credentials: CredentialResolver,
    defaults: RequestDefaults,
}

impl EnrollVoiceHandler {
    pub fn new(
        voice_client: Arc<dyn VoiceCustomizationPort>,
        credentials: CredentialResolver,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            voice_client,
            credentials,
            defaults,
        }
    }

    pub async fn handle(&self, command: EnrollVoice) -> Result<EnrollVoiceResponse, ApplicationError> {
        let api_key = self.credentials.resolve(command.api_key.as_deref())?;

        let audio = command
            .audio
            .ok_or_else(|| ApplicationError::validation("audio file is required"))?;
        if audio.len() > self.defaults.max_upload_bytes {
            return Err(ApplicationError::validation(format!(
                "audio file exceeds {} bytes",
                self.defaults.max_upload_bytes
            )));
        }

        // 显式 MIME > 上传文件类型 > audio/mpeg
        let mime_type = non_blank(command.audio_mime_type.as_deref())
            .or_else(|| non_blank(command.upload_content_type.as_deref()))
            .unwrap_or(AudioSample::DEFAULT_MIME_TYPE);
        let sample = AudioSample::new(audio, mime_type).map_err(ApplicationError::validation)?;

        let request = EnrollVoiceRequest {
            api_key,
            preferred_name: or_default(command.preferred_name.as_deref(), ""),
            target_model: or_default(command.target_model.as_deref(), &self.defaults.enroll_model),
            sample,
        };

        tracing::debug!(
            target_model = %request.target_model,
            audio_size = request.sample.len(),
            mime_type = %request.sample.mime_type(),
            "Enrolling voice"
        );

        let voice = self.voice_client.enroll_voice(request).await?;

        tracing::info!(voice = %voice, "Voice enrolled");

        Ok(EnrollVoiceResponse { voice })
    }
}
