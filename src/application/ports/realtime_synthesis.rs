//! Realtime Synthesis Port - 实时语音合成连接抽象
//!
//! 一次连接对应一次合成会话。远端事件由适配器在自己的任务中
//! 推送给 [`EventCollector`]，调用方只负责发送指令和关闭连接。

use async_trait::async_trait;
use thiserror::Error;

use crate::application::synthesis::EventCollector;
use crate::domain::synthesis::ClientCommand;
use crate::domain::voice::ApiKey;

/// 实时连接错误
#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Connection already closed")]
    Closed,
}

/// 建立连接所需的参数
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// 合成模型
    pub model: String,
    /// 访问凭证
    pub api_key: ApiKey,
}

/// 一条已建立的实时合成连接
#[async_trait]
pub trait RealtimeConnection: Send {
    /// 发送一条客户端指令
    async fn send(&mut self, command: ClientCommand) -> Result<(), RealtimeError>;

    /// 关闭连接并停止事件推送，重复调用无副作用
    async fn close(&mut self);
}

/// Realtime Connector Port
///
/// 远端流式合成服务的抽象接口
#[async_trait]
pub trait RealtimeConnectorPort: Send + Sync {
    /// 建立连接，之后的远端事件全部交给 `collector`
    async fn connect(
        &self,
        request: ConnectRequest,
        collector: EventCollector,
    ) -> Result<Box<dyn RealtimeConnection>, RealtimeError>;
}
