//! VoiceCraft - 声音定制与实时合成网关

use std::sync::Arc;

use anyhow::Context;
use voicecraft::application::{CredentialResolver, SessionDriver};
use voicecraft::config::{load_config, print_config, LogConfig};
use voicecraft::infrastructure::adapters::{
    DashscopeRealtimeConnector, DashscopeVoiceClient, DashscopeVoiceClientConfig, WavTranscoder,
};
use voicecraft::infrastructure::http::{AppState, HttpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("VoiceCraft - 声音定制与实时合成网关");
    print_config(&config);

    // 音色创建（HTTP）
    let voice_client = DashscopeVoiceClient::new(DashscopeVoiceClientConfig {
        http_url: config.dashscope.http_url.clone(),
        timeout_secs: config.dashscope.request_timeout_secs,
    })
    .context("Failed to create DashScope voice client")?;

    // 实时合成（WebSocket）
    let connector = DashscopeRealtimeConnector::new(config.dashscope.realtime_url.clone());
    let driver = SessionDriver::new(Arc::new(connector))
        .with_completion_timeout(config.synthesis.completion_timeout());

    let state = AppState::new(
        Arc::new(voice_client),
        Arc::new(driver),
        Arc::new(WavTranscoder::new()),
        CredentialResolver::new(config.dashscope.api_key.as_deref()),
        config.synthesis.request_defaults(),
    );

    let server = HttpServer::new(
        config.server.clone(),
        state,
        config.synthesis.max_upload_bytes,
    );

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志
///
/// RUST_LOG 存在时优先使用
fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},voicecraft={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
