//! Scripted Realtime Connector - 测试用的实时合成连接
//!
//! 收到输入结束指令后，在独立任务中按脚本向收集器推送事件

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::application::ports::{
    ConnectRequest, RealtimeConnection, RealtimeConnectorPort, RealtimeError,
};
use crate::application::synthesis::EventCollector;
use crate::domain::synthesis::{ClientCommand, SynthesisEvent};

/// 脚本中的一步
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// 推送一个事件
    Event(SynthesisEvent),
    /// 连接被远端关闭
    Close { code: u16, reason: String },
    /// 消息无法解析
    ProcessingError(String),
    /// 不再推送任何东西，连接保持打开
    Stall,
}

#[derive(Default)]
struct ConnectorStats {
    connects: AtomicUsize,
    closes: AtomicUsize,
    sent: Mutex<Vec<ClientCommand>>,
    last_model: Mutex<Option<String>>,
}

/// 按脚本回放事件的连接器
pub struct ScriptedRealtimeConnector {
    script: Vec<ScriptStep>,
    fail_connect: bool,
    fail_send: bool,
    stall_connect: bool,
    stall_send: bool,
    stats: Arc<ConnectorStats>,
}

impl ScriptedRealtimeConnector {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            fail_connect: false,
            fail_send: false,
            stall_connect: false,
            stall_send: false,
            stats: Arc::new(ConnectorStats::default()),
        }
    }

    /// 连接阶段即失败
    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::new(Vec::new())
        }
    }

    /// 连接成功但发送失败
    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::new(Vec::new())
        }
    }

    /// 握手永远不完成
    pub fn stalling_connect() -> Self {
        Self {
            stall_connect: true,
            ..Self::new(Vec::new())
        }
    }

    /// 连接成功但发送永远阻塞
    pub fn stalling_send() -> Self {
        Self {
            stall_send: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn connect_count(&self) -> usize {
        self.stats.connects.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.stats.closes.load(Ordering::SeqCst)
    }

    pub fn sent_commands(&self) -> Vec<ClientCommand> {
        self.stats.sent.lock().unwrap().clone()
    }

    pub fn last_model(&self) -> Option<String> {
        self.stats.last_model.lock().unwrap().clone()
    }
}

#[async_trait]
impl RealtimeConnectorPort for ScriptedRealtimeConnector {
    async fn connect(
        &self,
        request: ConnectRequest,
        collector: EventCollector,
    ) -> Result<Box<dyn RealtimeConnection>, RealtimeError> {
        if self.fail_connect {
            return Err(RealtimeError::ConnectionFailed(
                "scripted connect failure".to_string(),
            ));
        }
        if self.stall_connect {
            std::future::pending::<()>().await;
        }
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        *self.stats.last_model.lock().unwrap() = Some(request.model);
        collector.on_open();

        Ok(Box::new(ScriptedConnection {
            script: self.script.clone(),
            fail_send: self.fail_send,
            stall_send: self.stall_send,
            stats: self.stats.clone(),
            collector: Some(collector),
            delivery: None,
            closed: false,
        }))
    }
}

struct ScriptedConnection {
    script: Vec<ScriptStep>,
    fail_send: bool,
    stall_send: bool,
    stats: Arc<ConnectorStats>,
    collector: Option<EventCollector>,
    delivery: Option<JoinHandle<()>>,
    closed: bool,
}

impl ScriptedConnection {
    fn start_delivery(&mut self) {
        let Some(collector) = self.collector.clone() else {
            return;
        };
        let script = std::mem::take(&mut self.script);
        self.delivery = Some(tokio::spawn(async move {
            for step in script {
                match step {
                    ScriptStep::Event(event) => collector.on_event(event),
                    ScriptStep::Close { code, reason } => collector.on_close(code, &reason),
                    ScriptStep::ProcessingError(cause) => collector.on_processing_error(cause),
                    ScriptStep::Stall => std::future::pending::<()>().await,
                }
                tokio::task::yield_now().await;
            }
        }));
    }
}

#[async_trait]
impl RealtimeConnection for ScriptedConnection {
    async fn send(&mut self, command: ClientCommand) -> Result<(), RealtimeError> {
        if self.closed {
            return Err(RealtimeError::Closed);
        }
        if self.fail_send {
            return Err(RealtimeError::SendFailed("scripted send failure".to_string()));
        }
        if self.stall_send {
            std::future::pending::<()>().await;
        }
        let finish = command == ClientCommand::Finish;
        self.stats.sent.lock().unwrap().push(command);
        if finish {
            self.start_delivery();
        }
        Ok(())
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(delivery) = self.delivery.take() {
            delivery.abort();
        }
        self.collector = None;
    }
}
