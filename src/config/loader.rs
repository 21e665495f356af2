//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量 `VOICECRAFT_*`
//! 2. 环境变量 `DASHSCOPE_API_KEY`
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File, Map};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::synthesis::EncodingTable;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

const ENV_PREFIX: &str = "VOICECRAFT";

/// 服务商约定的凭证变量
const PROVIDER_KEY_VAR: &str = "DASHSCOPE_API_KEY";

/// 加载应用配置
///
/// # 环境变量示例
/// - `VOICECRAFT_SERVER__PORT=8080`
/// - `VOICECRAFT_DASHSCOPE__API_KEY=sk-xxx`
/// - `VOICECRAFT_SYNTHESIS__COMPLETION_TIMEOUT_SECS=30`
/// - `DASHSCOPE_API_KEY=sk-xxx`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    build_config(config_path, None)
}

/// `env` 为 None 时读取进程环境变量
fn build_config(
    config_path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 2. DASHSCOPE_API_KEY 映射到 dashscope.api_key
    let provider_key = match &env {
        Some(vars) => vars.get(PROVIDER_KEY_VAR).cloned(),
        None => std::env::var(PROVIDER_KEY_VAR).ok(),
    };
    if let Some(key) = provider_key.filter(|key| !key.trim().is_empty()) {
        let mut vars = Map::new();
        vars.insert(format!("{}_DASHSCOPE__API_KEY", ENV_PREFIX), key);
        builder = builder.add_source(prefixed_environment(Some(vars)));
    }

    // 3. VOICECRAFT_ 环境变量（最高优先级）
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(prefixed_environment(env));

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn prefixed_environment(source: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(source)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.dashscope.http_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "DashScope HTTP URL cannot be empty".to_string(),
        ));
    }

    let realtime_url = config.dashscope.realtime_url.trim();
    if realtime_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "DashScope realtime URL cannot be empty".to_string(),
        ));
    }
    if !(realtime_url.starts_with("ws://") || realtime_url.starts_with("wss://")) {
        return Err(ConfigError::ValidationError(format!(
            "DashScope realtime URL must use ws:// or wss://, got {}",
            realtime_url
        )));
    }

    if config.synthesis.completion_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Completion timeout cannot be 0".to_string(),
        ));
    }

    let encodings = EncodingTable::default();
    if !encodings.supports(config.synthesis.sample_rate) {
        return Err(ConfigError::ValidationError(format!(
            "Default sample rate {} is not supported (supported: {:?})",
            config.synthesis.sample_rate,
            encodings.sample_rates()
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {:?} at {}",
            config.server.static_files.dir,
            config.server.static_files.path
        );
    }
    tracing::info!("DashScope HTTP URL: {}", config.dashscope.http_url);
    tracing::info!("DashScope Realtime URL: {}", config.dashscope.realtime_url);
    tracing::info!(
        "DashScope API Key: {}",
        if config.dashscope.has_api_key() {
            "configured"
        } else {
            "not configured (per-request)"
        }
    );
    tracing::info!("Design Model: {}", config.synthesis.design_model);
    tracing::info!("Enroll Model: {}", config.synthesis.enroll_model);
    tracing::info!("Default Sample Rate: {}", config.synthesis.sample_rate);
    tracing::info!(
        "Completion Timeout: {}s",
        config.synthesis.completion_timeout_secs
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
