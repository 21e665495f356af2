//! Synthesis Commands

/// 语音合成命令
#[derive(Debug, Clone, Default)]
pub struct SynthesizeSpeech {
    pub api_key: Option<String>,
    pub voice: Option<String>,
    pub text: Option<String>,
    pub model: Option<String>,
    pub sample_rate: Option<u32>,
    /// `wav` 或 `pcm`
    pub format: Option<String>,
}
