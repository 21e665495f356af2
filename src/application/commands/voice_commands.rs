//! Voice Commands

/// 声音设计命令
#[derive(Debug, Clone, Default)]
pub struct DesignVoice {
    pub api_key: Option<String>,
    pub voice_prompt: Option<String>,
    pub preview_text: Option<String>,
    pub preferred_name: Option<String>,
    pub language: Option<String>,
    pub target_model: Option<String>,
    pub sample_rate: Option<u32>,
    pub response_format: Option<String>,
}

/// 声音复刻命令
#[derive(Debug, Clone, Default)]
pub struct EnrollVoice {
    pub api_key: Option<String>,
    /// 上传的样本音频
    pub audio: Option<Vec<u8>>,
    /// 显式指定的 MIME 类型
    pub audio_mime_type: Option<String>,
    /// 上传文件自带的 Content-Type
    pub upload_content_type: Option<String>,
    pub preferred_name: Option<String>,
    pub target_model: Option<String>,
}
