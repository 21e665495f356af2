//! DashScope Realtime Client - 实时合成 WebSocket 连接
//!
//! 实现 RealtimeConnectorPort：
//! - 握手时携带 `Authorization: Bearer {key}`，模型放在查询参数里
//! - 读取在独立任务中进行，解析后的事件直接推送给收集器
//! - 发送端由会话驱动持有，关闭时发送 close 帧并停止读取任务

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, AUTHORIZATION};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use super::messages::{decode_event, encode_command};
use crate::application::ports::{
    ConnectRequest, RealtimeConnection, RealtimeConnectorPort, RealtimeError,
};
use crate::application::synthesis::EventCollector;
use crate::domain::synthesis::ClientCommand;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 没有 close 帧时上报的关闭码
const ABNORMAL_CLOSE: u16 = 1006;

/// DashScope 实时合成连接器
pub struct DashscopeRealtimeConnector {
    realtime_url: String,
}

impl DashscopeRealtimeConnector {
    pub fn new(realtime_url: impl Into<String>) -> Self {
        Self {
            realtime_url: realtime_url.into(),
        }
    }

    /// 模型作为查询参数追加，保留已有参数
    fn endpoint(&self, model: &str) -> Result<Url, RealtimeError> {
        let mut url = Url::parse(self.realtime_url.trim_end_matches('/'))
            .map_err(|e| RealtimeError::ConnectionFailed(format!("Invalid realtime URL: {}", e)))?;
        url.query_pairs_mut().append_pair("model", model);
        Ok(url)
    }
}

#[async_trait]
impl RealtimeConnectorPort for DashscopeRealtimeConnector {
    async fn connect(
        &self,
        request: ConnectRequest,
        collector: EventCollector,
    ) -> Result<Box<dyn RealtimeConnection>, RealtimeError> {
        let url = self.endpoint(&request.model)?;

        let mut ws_request = url
            .as_str()
            .into_client_request()
            .map_err(|e| RealtimeError::ConnectionFailed(format!("Invalid realtime URL: {}", e)))?;
        let auth = HeaderValue::from_str(&request.api_key.bearer())
            .map_err(|e| RealtimeError::ConnectionFailed(format!("Invalid API key: {}", e)))?;
        ws_request.headers_mut().insert(AUTHORIZATION, auth);

        tracing::debug!(url = %url, "Connecting to realtime synthesis");

        let (ws_stream, _response) = connect_async(ws_request)
            .await
            .map_err(|e| RealtimeError::ConnectionFailed(e.to_string()))?;

        collector.on_open();

        let (sink, stream) = ws_stream.split();
        let reader = tokio::spawn(read_events(stream, collector));

        Ok(Box::new(DashscopeConnection {
            sink,
            reader,
            closed: false,
        }))
    }
}

/// 读取循环
///
/// close 帧或流结束都会通知收集器；读取错误直接结束，不设置终态
async fn read_events(mut stream: SplitStream<WsStream>, collector: EventCollector) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match decode_event(&text) {
                Ok(event) => collector.on_event(event),
                Err(e) => {
                    collector.on_processing_error(format!("Failed to parse realtime event: {}", e))
                }
            },
            Ok(Message::Close(frame)) => {
                let (code, reason) = frame
                    .map(|f| (u16::from(f.code), f.reason.into_owned()))
                    .unwrap_or((ABNORMAL_CLOSE, String::new()));
                collector.on_close(code, &reason);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Realtime connection read failed");
                return;
            }
        }
    }
    collector.on_close(ABNORMAL_CLOSE, "stream ended");
}

struct DashscopeConnection {
    sink: SplitSink<WsStream, Message>,
    reader: JoinHandle<()>,
    closed: bool,
}

#[async_trait]
impl RealtimeConnection for DashscopeConnection {
    async fn send(&mut self, command: ClientCommand) -> Result<(), RealtimeError> {
        if self.closed {
            return Err(RealtimeError::Closed);
        }
        let text = encode_command(&command).map_err(|e| RealtimeError::SendFailed(e.to_string()))?;
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| RealtimeError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.sink.close().await {
            tracing::debug!(error = %e, "Close frame not delivered");
        }
        self.reader.abort();
    }
}

impl Drop for DashscopeConnection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
