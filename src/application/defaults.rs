//! 请求缺省值
//!
//! 请求里没有填写（或只有空白）的可选字段使用这里的值

/// 请求缺省值
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    /// 声音设计绑定的模型，也是合成的默认模型
    pub design_model: String,
    /// 声音复刻绑定的模型
    pub enroll_model: String,
    pub sample_rate: u32,
    /// 预览音频格式
    pub response_format: String,
    pub language: String,
    /// 上传样本音频的最大字节数
    pub max_upload_bytes: usize,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            design_model: "qwen3-tts-vd-realtime-2025-12-16".to_string(),
            enroll_model: "qwen3-tts-vc-realtime-2026-01-15".to_string(),
            sample_rate: 24000,
            response_format: "wav".to_string(),
            language: "zh".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// 去除空白，空串返回 None
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// 可选字段取值，缺省时回落
pub(crate) fn or_default(value: Option<&str>, default: &str) -> String {
    non_blank(value).unwrap_or(default).to_string()
}

/// 采样率为空或 0 时回落
pub(crate) fn rate_or_default(value: Option<u32>, default: u32) -> u32 {
    value.filter(|rate| *rate > 0).unwrap_or(default)
}
