//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::RequestDefaults;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// DashScope 接入配置
    #[serde(default)]
    pub dashscope: DashscopeConfig,

    /// 合成与音色创建的缺省参数
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// DashScope 接入配置
#[derive(Clone, Deserialize)]
pub struct DashscopeConfig {
    /// 进程级凭证，非空时优先于请求携带的凭证
    #[serde(default)]
    pub api_key: Option<String>,

    /// 音色创建接口
    #[serde(default = "default_http_url")]
    pub http_url: String,

    /// 实时合成接口
    #[serde(default = "default_realtime_url")]
    pub realtime_url: String,

    /// 音色创建请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_http_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/audio/tts/customization".to_string()
}

fn default_realtime_url() -> String {
    "wss://dashscope.aliyuncs.com/api-ws/v1/realtime".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for DashscopeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            http_url: default_http_url(),
            realtime_url: default_realtime_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl DashscopeConfig {
    /// 是否配置了非空凭证
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

// 凭证不进日志
impl std::fmt::Debug for DashscopeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashscopeConfig")
            .field("api_key", &self.has_api_key().then_some("***"))
            .field("http_url", &self.http_url)
            .field("realtime_url", &self.realtime_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// 合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 声音设计模型，也是合成的默认模型
    #[serde(default = "default_design_model")]
    pub design_model: String,

    /// 声音复刻模型
    #[serde(default = "default_enroll_model")]
    pub enroll_model: String,

    /// 默认采样率（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 预览音频格式
    #[serde(default = "default_response_format")]
    pub response_format: String,

    /// 默认语言
    #[serde(default = "default_language")]
    pub language: String,

    /// 等待合成完成的上限（秒）
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,

    /// 上传样本音频最大字节数，默认 10MB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_design_model() -> String {
    "qwen3-tts-vd-realtime-2025-12-16".to_string()
}

fn default_enroll_model() -> String {
    "qwen3-tts-vc-realtime-2026-01-15".to_string()
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_response_format() -> String {
    "wav".to_string()
}

fn default_language() -> String {
    "zh".to_string()
}

fn default_completion_timeout() -> u64 {
    60
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            design_model: default_design_model(),
            enroll_model: default_enroll_model(),
            sample_rate: default_sample_rate(),
            response_format: default_response_format(),
            language: default_language(),
            completion_timeout_secs: default_completion_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl SynthesisConfig {
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// 转换为请求缺省值
    pub fn request_defaults(&self) -> RequestDefaults {
        RequestDefaults {
            design_model: self.design_model.clone(),
            enroll_model: self.enroll_model.clone(),
            sample_rate: self.sample_rate,
            response_format: self.response_format.clone(),
            language: self.language.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
