//! Event Collector - 远端事件收集器
//!
//! 传输层在自己的任务/线程里推送事件，调用方在另一侧等待最终结果。
//! 两侧只通过一把互斥锁和一个 oneshot 通道交互：
//! - 音频片段按到达顺序追加到累积缓冲区
//! - 终态（成功 / 远端错误）只会被设置一次，之后的事件全部忽略
//! - 等待方只有一个，[`OutcomeWaiter`] 按值消费

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use base64::prelude::*;
use tokio::sync::oneshot;

use crate::domain::synthesis::SynthesisEvent;

/// 会话的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// 正常完成，携带累积的 PCM 数据
    Success(Vec<u8>),
    /// 远端报告错误或事件处理失败
    RemoteError(String),
    /// 截止时间内没有收到终态信号
    Timeout,
}

struct CollectorState {
    /// 累积的音频数据
    audio: Vec<u8>,
    /// 终态信号，取走即表示终态已设置
    completion: Option<oneshot::Sender<CompletionOutcome>>,
    /// 已追加的音频片段数
    chunks: usize,
}

impl CollectorState {
    fn is_terminal(&self) -> bool {
        self.completion.is_none()
    }

    fn complete(&mut self, outcome: CompletionOutcome) {
        if let Some(sender) = self.completion.take() {
            // 等待方已放弃时发送失败，忽略即可
            let _ = sender.send(outcome);
        }
    }

    fn succeed(&mut self) {
        let audio = std::mem::take(&mut self.audio);
        tracing::debug!(
            chunks = self.chunks,
            audio_size = audio.len(),
            "Realtime session completed"
        );
        self.complete(CompletionOutcome::Success(audio));
    }

    fn fail(&mut self, cause: String) {
        tracing::warn!(cause = %cause, "Realtime session failed");
        self.complete(CompletionOutcome::RemoteError(cause));
    }
}

/// 事件收集器
///
/// 可以廉价克隆，所有克隆共享同一份状态
#[derive(Clone)]
pub struct EventCollector {
    state: Arc<Mutex<CollectorState>>,
}

/// 终态等待方
pub struct OutcomeWaiter {
    receiver: oneshot::Receiver<CompletionOutcome>,
}

impl EventCollector {
    /// 创建收集器及其唯一的等待方
    pub fn new() -> (Self, OutcomeWaiter) {
        let (sender, receiver) = oneshot::channel();
        let collector = Self {
            state: Arc::new(Mutex::new(CollectorState {
                audio: Vec::new(),
                completion: Some(sender),
                chunks: 0,
            })),
        };
        (collector, OutcomeWaiter { receiver })
    }

    fn lock(&self) -> MutexGuard<'_, CollectorState> {
        // 推送方不会在持锁期间 panic，中毒时沿用内部状态
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 连接建立
    pub fn on_open(&self) {
        tracing::debug!("Realtime connection opened");
    }

    /// 处理一个远端事件
    pub fn on_event(&self, event: SynthesisEvent) {
        let mut state = self.lock();
        if state.is_terminal() {
            tracing::trace!(event = ?event, "Event after terminal signal ignored");
            return;
        }

        match event {
            SynthesisEvent::AudioDelta(payload) => match BASE64_STANDARD.decode(payload.as_bytes()) {
                Ok(chunk) => {
                    state.audio.extend_from_slice(&chunk);
                    state.chunks += 1;
                }
                Err(e) => state.fail(format!("Failed to decode audio delta: {}", e)),
            },
            SynthesisEvent::Done | SynthesisEvent::SessionFinished => state.succeed(),
            SynthesisEvent::ProtocolError(cause) => state.fail(cause),
            SynthesisEvent::Other(kind) => {
                tracing::debug!(event_type = %kind, "Ignoring realtime event");
            }
        }
    }

    /// 事件处理失败（例如无法解析的消息）
    pub fn on_processing_error(&self, cause: impl Into<String>) {
        let mut state = self.lock();
        if !state.is_terminal() {
            state.fail(cause.into());
        }
    }

    /// 连接关闭
    ///
    /// 尚未进入终态时视为隐式完成，已有终态时不覆盖
    pub fn on_close(&self, code: u16, reason: &str) {
        let mut state = self.lock();
        if state.is_terminal() {
            return;
        }
        tracing::debug!(code, reason = %reason, "Connection closed before completion event");
        state.succeed();
    }

    /// 是否已进入终态
    pub fn is_complete(&self) -> bool {
        self.lock().is_terminal()
    }
}

impl OutcomeWaiter {
    /// 等待终态，最多等待 `timeout`
    ///
    /// 所有推送方都已释放却没有设置终态时，结果不可能再到达，直接按超时返回
    pub async fn await_outcome(self, timeout: Duration) -> CompletionOutcome {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => {
                tracing::warn!("Event source dropped without a terminal signal");
                CompletionOutcome::Timeout
            }
            Err(_) => CompletionOutcome::Timeout,
        }
    }
}
