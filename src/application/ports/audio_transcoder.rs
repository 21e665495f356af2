//! Audio Transcoder Port - 音频封装抽象
//!
//! 合成结果是原始 PCM，按请求决定是否封装为 WAV 容器

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 封装错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 音频输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WAV 容器
    #[default]
    Wav,
    /// 原始 PCM，无文件头
    Pcm,
}

impl AudioFormat {
    /// 宽松解析：只有 `pcm` 选择原始 PCM，其余都按 WAV 处理
    pub fn from_request(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "pcm" => AudioFormat::Pcm,
            _ => AudioFormat::Wav,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Pcm => "audio/pcm",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Wav => write!(f, "wav"),
            AudioFormat::Pcm => write!(f, "pcm"),
        }
    }
}

/// 封装结果
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    /// 输出数据
    pub audio_data: Vec<u8>,
    /// 输出格式
    pub format: AudioFormat,
    /// 时长（毫秒）
    pub duration_ms: u64,
}

impl EncodedAudio {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// 音频信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInfo {
    /// 时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// 位深度
    pub bits_per_sample: u16,
    /// data chunk 声明的大小（字节）
    pub data_size: usize,
}

/// Audio Transcoder Port
///
/// 输入固定为单声道 16 位小端 PCM，不做重采样和混音
pub trait AudioTranscoderPort: Send + Sync {
    /// 按目标格式输出
    fn encode(
        &self,
        pcm: &[u8],
        sample_rate: u32,
        format: AudioFormat,
    ) -> Result<EncodedAudio, TranscodeError>;

    /// 读取 WAV 头信息
    fn get_audio_info(&self, wav_data: &[u8]) -> Result<AudioInfo, TranscodeError>;
}
