//! Synthesis Command Handlers

use std::sync::Arc;

use crate::application::commands::SynthesizeSpeech;
use crate::application::credentials::CredentialResolver;
use crate::application::defaults::{non_blank, or_default, rate_or_default, RequestDefaults};
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioFormat, AudioTranscoderPort, EncodedAudio};
use crate::application::synthesis::{SessionDriver, SynthesisRequest};

/// SynthesizeSpeech Handler
pub struct SynthesizeSpeechHandler {
    driver: Arc<SessionDriver>,
    transcoder: Arc<dyn AudioTranscoderPort>,
    credentials: CredentialResolver,
    defaults: RequestDefaults,
}

impl SynthesizeSpeechHandler {
    pub fn new(
        driver: Arc<SessionDriver>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        credentials: CredentialResolver,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            driver,
            transcoder,
            credentials,
            defaults,
        }
    }

    pub async fn handle(&self, command: SynthesizeSpeech) -> Result<EncodedAudio, ApplicationError> {
        let api_key = self.credentials.resolve(command.api_key.as_deref())?;

        let voice = non_blank(command.voice.as_deref())
            .ok_or_else(|| ApplicationError::validation("voice is required"))?
            .to_string();
        let text = non_blank(command.text.as_deref())
            .ok_or_else(|| ApplicationError::validation("text is required"))?
            .to_string();
        let model = or_default(command.model.as_deref(), &self.defaults.design_model);
        let sample_rate = rate_or_default(command.sample_rate, self.defaults.sample_rate);
        let format = AudioFormat::from_request(command.format.as_deref());

        let pcm = self
            .driver
            .synthesize(SynthesisRequest {
                api_key,
                model,
                voice,
                text,
                sample_rate,
            })
            .await?;

        let encoded = self.transcoder.encode(&pcm, sample_rate, format)?;

        tracing::debug!(
            format = %encoded.format,
            pcm_size = pcm.len(),
            output_size = encoded.audio_data.len(),
            duration_ms = encoded.duration_ms,
            "Speech encoded"
        );

        Ok(encoded)
    }
}
