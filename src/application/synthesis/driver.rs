//! Session Driver - 单次实时合成会话的驱动
//!
//! 流程: 连接 → 会话配置 → 发送全文 → 输入结束 → 等待收集器终态 → 关闭连接
//!
//! 每次调用打开且只关闭一条连接，不做重试，重试策略由调用方决定。
//! 连接、发送和等待共用同一个截止时间，关闭另有独立上限。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, timeout_at, Instant};

use super::collector::{CompletionOutcome, EventCollector, OutcomeWaiter};
use crate::application::ports::{
    ConnectRequest, RealtimeConnection, RealtimeConnectorPort, RealtimeError,
};
use crate::domain::synthesis::{
    ClientCommand, EncodingTable, InputMode, Session, SessionState, SynthesisError,
};
use crate::domain::voice::ApiKey;

/// 默认等待上限
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// 关闭连接的等待上限
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub api_key: ApiKey,
    pub model: String,
    pub voice: String,
    pub text: String,
    pub sample_rate: u32,
}

/// Session Driver
pub struct SessionDriver {
    connector: Arc<dyn RealtimeConnectorPort>,
    encodings: EncodingTable,
    completion_timeout: Duration,
}

impl SessionDriver {
    pub fn new(connector: Arc<dyn RealtimeConnectorPort>) -> Self {
        Self {
            connector,
            encodings: EncodingTable::default(),
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    pub fn with_encodings(mut self, encodings: EncodingTable) -> Self {
        self.encodings = encodings;
        self
    }

    /// 整个会话（连接、发送、等待完成）的时间上限
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn encodings(&self) -> &EncodingTable {
        &self.encodings
    }

    /// 合成语音，返回原始 PCM
    pub async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let encoding = self.encodings.lookup(request.sample_rate)?;
        let mut session = Session::new(&request.model, &request.voice, encoding);
        let deadline = Instant::now() + self.completion_timeout;

        tracing::info!(
            session_id = %session.id(),
            model = %session.model(),
            voice = %session.voice(),
            sample_rate = encoding.sample_rate,
            text_len = request.text.chars().count(),
            "Starting realtime synthesis"
        );

        let (collector, waiter) = EventCollector::new();
        let connect_request = ConnectRequest {
            model: request.model.clone(),
            api_key: request.api_key.clone(),
        };
        let connected = self
            .within(deadline, "connect", self.connector.connect(connect_request, collector))
            .await;
        let mut connection = match connected {
            Ok(connection) => connection,
            Err(e) => {
                session.fail();
                tracing::warn!(session_id = %session.id(), error = %e, "Realtime connect failed");
                return Err(e);
            }
        };
        session.advance(SessionState::Connected)?;

        let streamed = self
            .stream(&mut session, connection.as_mut(), request.text, waiter, deadline)
            .await;

        // 无论结果如何都释放连接
        if timeout(CLOSE_TIMEOUT, connection.close()).await.is_err() {
            tracing::warn!(session_id = %session.id(), "Realtime connection close timed out");
        }
        drop(connection);

        let outcome = match streamed {
            Ok(outcome) => outcome,
            Err(e) => {
                session.fail();
                tracing::warn!(session_id = %session.id(), error = %e, "Realtime streaming failed");
                return Err(e);
            }
        };

        let result = Self::translate(outcome, self.completion_timeout);
        match &result {
            Ok(audio) => {
                session.advance(SessionState::Completed)?;
                tracing::info!(
                    session_id = %session.id(),
                    audio_size = audio.len(),
                    duration_ms = encoding.duration_ms(audio.len()),
                    elapsed_ms = session.elapsed_ms(),
                    "Realtime synthesis completed"
                );
            }
            Err(e) => {
                session.fail();
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    elapsed_ms = session.elapsed_ms(),
                    "Realtime synthesis failed"
                );
            }
        }
        result
    }

    /// 发送全部指令并等待终态
    async fn stream(
        &self,
        session: &mut Session,
        connection: &mut dyn RealtimeConnection,
        text: String,
        waiter: OutcomeWaiter,
        deadline: Instant,
    ) -> Result<CompletionOutcome, SynthesisError> {
        let encoding = *session.encoding();

        let update = ClientCommand::UpdateSession {
            voice: session.voice().to_string(),
            response_format: encoding.wire_format.to_string(),
            sample_rate: encoding.sample_rate,
            mode: InputMode::ServerCommit,
        };
        self.within(deadline, "session.update", connection.send(update))
            .await?;
        self.within(deadline, "text append", connection.send(ClientCommand::AppendText(text)))
            .await?;
        session.advance(SessionState::Streaming)?;

        self.within(deadline, "session.finish", connection.send(ClientCommand::Finish))
            .await?;
        session.advance(SessionState::Finishing)?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        Ok(waiter.await_outcome(remaining).await)
    }

    /// 在截止时间内完成一次传输操作
    async fn within<T, F>(&self, deadline: Instant, step: &str, op: F) -> Result<T, SynthesisError>
    where
        F: Future<Output = Result<T, RealtimeError>>,
    {
        match timeout_at(deadline, op).await {
            Ok(result) => result.map_err(|e| SynthesisError::Transport(e.to_string())),
            Err(_) => Err(SynthesisError::Transport(format!(
                "{} did not complete within {}s",
                step,
                self.completion_timeout.as_secs_f32()
            ))),
        }
    }

    fn translate(outcome: CompletionOutcome, timeout: Duration) -> Result<Vec<u8>, SynthesisError> {
        match outcome {
            CompletionOutcome::Success(audio) if audio.is_empty() => Err(SynthesisError::EmptyResult),
            CompletionOutcome::Success(audio) => Ok(audio),
            CompletionOutcome::RemoteError(cause) => Err(SynthesisError::RemoteSynthesis(cause)),
            CompletionOutcome::Timeout => Err(SynthesisError::Transport(format!(
                "no completion signal within {}s",
                timeout.as_secs_f32()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::{EncodingDescriptor, SynthesisEvent};
    use crate::infrastructure::adapters::fake::{ScriptStep, ScriptedRealtimeConnector};
    use base64::prelude::*;

    fn request(sample_rate: u32) -> SynthesisRequest {
        SynthesisRequest {
            api_key: ApiKey::parse("sk-test").unwrap(),
            model: "qwen3-tts-vd-realtime-2025-12-16".to_string(),
            voice: "v1".to_string(),
            text: "hello".to_string(),
            sample_rate,
        }
    }

    fn delta(bytes: &[u8]) -> ScriptStep {
        ScriptStep::Event(SynthesisEvent::AudioDelta(BASE64_STANDARD.encode(bytes)))
    }

    #[tokio::test]
    async fn test_synthesize_collects_audio() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![
            delta(&[1; 100]),
            delta(&[2; 200]),
            ScriptStep::Event(SynthesisEvent::Done),
        ]));
        let driver = SessionDriver::new(connector.clone());

        let audio = driver.synthesize(request(24000)).await.unwrap();
        assert_eq!(audio.len(), 300);
        assert!(audio[..100].iter().all(|b| *b == 1));
        assert!(audio[100..].iter().all(|b| *b == 2));
        assert_eq!(connector.connect_count(), 1);
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_protocol_sequence() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![
            delta(&[0; 2]),
            ScriptStep::Event(SynthesisEvent::SessionFinished),
        ]));
        let driver = SessionDriver::new(connector.clone());
        driver.synthesize(request(24000)).await.unwrap();

        assert_eq!(
            connector.sent_commands(),
            vec![
                ClientCommand::UpdateSession {
                    voice: "v1".to_string(),
                    response_format: "pcm".to_string(),
                    sample_rate: 24000,
                    mode: InputMode::ServerCommit,
                },
                ClientCommand::AppendText("hello".to_string()),
                ClientCommand::Finish,
            ]
        );
        assert_eq!(connector.last_model().as_deref(), Some("qwen3-tts-vd-realtime-2025-12-16"));
    }

    #[tokio::test]
    async fn test_unsupported_sample_rate_never_connects() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![]));
        let driver = SessionDriver::new(connector.clone());

        let result = driver.synthesize(request(12345)).await;
        assert!(matches!(result, Err(SynthesisError::UnsupportedSampleRate(12345))));
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_extended_table_accepts_new_rate() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![
            delta(&[3; 4]),
            ScriptStep::Event(SynthesisEvent::Done),
        ]));
        let table = EncodingTable::default().with_encoding(EncodingDescriptor {
            sample_rate: 16000,
            channels: 1,
            bits_per_sample: 16,
            wire_format: "pcm",
            tag: "PCM_16000HZ_MONO_16BIT",
        });
        let driver = SessionDriver::new(connector).with_encodings(table);

        assert_eq!(driver.synthesize(request(16000)).await.unwrap(), vec![3; 4]);
    }

    #[tokio::test]
    async fn test_remote_error_closes_connection_once() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![
            delta(&[1; 10]),
            ScriptStep::Event(SynthesisEvent::ProtocolError("Throttling: rate limit".to_string())),
            ScriptStep::Event(SynthesisEvent::Done),
        ]));
        let driver = SessionDriver::new(connector.clone());

        match driver.synthesize(request(24000)).await {
            Err(SynthesisError::RemoteSynthesis(cause)) => assert_eq!(cause, "Throttling: rate limit"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_an_error() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![ScriptStep::Event(
            SynthesisEvent::Done,
        )]));
        let driver = SessionDriver::new(connector);

        assert!(matches!(
            driver.synthesize(request(24000)).await,
            Err(SynthesisError::EmptyResult)
        ));
    }

    #[tokio::test]
    async fn test_timeout_still_releases_connection() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![
            delta(&[1; 10]),
            ScriptStep::Stall,
        ]));
        let driver = SessionDriver::new(connector.clone())
            .with_completion_timeout(Duration::from_millis(50));

        let result = driver.synthesize(request(24000)).await;
        assert!(matches!(result, Err(SynthesisError::Transport(_))));
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_is_transport_error() {
        let connector = Arc::new(ScriptedRealtimeConnector::failing_connect());
        let driver = SessionDriver::new(connector.clone());

        assert!(matches!(
            driver.synthesize(request(24000)).await,
            Err(SynthesisError::Transport(_))
        ));
        assert_eq!(connector.close_count(), 0);
    }

    #[tokio::test]
    async fn test_send_failure_closes_connection() {
        let connector = Arc::new(ScriptedRealtimeConnector::failing_send());
        let driver = SessionDriver::new(connector.clone());

        assert!(matches!(
            driver.synthesize(request(24000)).await,
            Err(SynthesisError::Transport(_))
        ));
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_close_without_done_completes() {
        let connector = Arc::new(ScriptedRealtimeConnector::new(vec![
            delta(&[5; 6]),
            ScriptStep::Close {
                code: 1000,
                reason: "bye".to_string(),
            },
        ]));
        let driver = SessionDriver::new(connector);

        assert_eq!(driver.synthesize(request(24000)).await.unwrap(), vec![5; 6]);
    }

    #[tokio::test]
    async fn test_stalled_connect_respects_ceiling() {
        let connector = Arc::new(ScriptedRealtimeConnector::stalling_connect());
        let driver = SessionDriver::new(connector.clone())
            .with_completion_timeout(Duration::from_millis(100));

        let result = tokio::time::timeout(Duration::from_secs(5), driver.synthesize(request(24000)))
            .await
            .expect("synthesize must return within the ceiling");
        assert!(matches!(result, Err(SynthesisError::Transport(_))));
        assert_eq!(connector.close_count(), 0);
    }

    #[tokio::test]
    async fn test_stalled_send_respects_ceiling_and_closes() {
        let connector = Arc::new(ScriptedRealtimeConnector::stalling_send());
        let driver = SessionDriver::new(connector.clone())
            .with_completion_timeout(Duration::from_millis(100));

        let result = tokio::time::timeout(Duration::from_secs(5), driver.synthesize(request(24000)))
            .await
            .expect("synthesize must return within the ceiling");
        match result {
            Err(SynthesisError::Transport(msg)) => assert!(msg.contains("session.update")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(connector.close_count(), 1);
    }
}
