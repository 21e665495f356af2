//! Recording Voice Client - 测试用的音色创建客户端

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{
    DesignVoiceRequest, DesignedVoice, EnrollVoiceRequest, VoiceCustomizationError,
    VoiceCustomizationPort,
};

/// 记录所有请求并返回固定结果
pub struct RecordingVoiceClient {
    voice: String,
    preview_audio_base64: Option<String>,
    failure: Option<(u16, String)>,
    designs: Mutex<Vec<DesignVoiceRequest>>,
    enrollments: Mutex<Vec<EnrollVoiceRequest>>,
}

impl RecordingVoiceClient {
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            preview_audio_base64: None,
            failure: None,
            designs: Mutex::new(Vec::new()),
            enrollments: Mutex::new(Vec::new()),
        }
    }

    pub fn with_preview(mut self, preview_audio_base64: impl Into<String>) -> Self {
        self.preview_audio_base64 = Some(preview_audio_base64.into());
        self
    }

    /// 所有调用都返回远端错误
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            failure: Some((status, message.into())),
            ..Self::new("")
        }
    }

    pub fn designs(&self) -> Vec<DesignVoiceRequest> {
        self.designs.lock().unwrap().clone()
    }

    pub fn enrollments(&self) -> Vec<EnrollVoiceRequest> {
        self.enrollments.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), VoiceCustomizationError> {
        match &self.failure {
            Some((status, message)) => Err(VoiceCustomizationError::ServiceError {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VoiceCustomizationPort for RecordingVoiceClient {
    async fn design_voice(
        &self,
        request: DesignVoiceRequest,
    ) -> Result<DesignedVoice, VoiceCustomizationError> {
        self.designs.lock().unwrap().push(request);
        self.check_failure()?;
        Ok(DesignedVoice {
            voice: self.voice.clone(),
            preview_audio_base64: self.preview_audio_base64.clone(),
        })
    }

    async fn enroll_voice(
        &self,
        request: EnrollVoiceRequest,
    ) -> Result<String, VoiceCustomizationError> {
        self.enrollments.lock().unwrap().push(request);
        self.check_failure()?;
        Ok(self.voice.clone())
    }
}
