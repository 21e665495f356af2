//! Synthesis Context - 合成会话
//!
//! 一次 TTS 请求对应一个会话，由 SessionDriver 独占，调用返回即销毁。
//!
//! 状态机:
//! ```text
//! Created → Connected → Streaming → Finishing → Completed
//!    └──────────┴───────────┴───────────┴──────→ Failed
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{EncodingDescriptor, SynthesisError};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Connected,
    Streaming,
    Finishing,
    Completed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// 是否允许转换到 `next`
    fn can_advance_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Created, Connected)
            | (Connected, Streaming)
            | (Streaming, Finishing)
            | (Finishing, Completed) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Connected => "connected",
            Self::Streaming => "streaming",
            Self::Finishing => "finishing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// 合成会话
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    model: String,
    voice: String,
    encoding: EncodingDescriptor,
    state: SessionState,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(model: impl Into<String>, voice: impl Into<String>, encoding: EncodingDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            voice: voice.into(),
            encoding,
            state: SessionState::Created,
            started_at: Utc::now(),
        }
    }

    /// 推进状态
    pub fn advance(&mut self, next: SessionState) -> Result<(), SynthesisError> {
        if !self.state.can_advance_to(next) {
            return Err(SynthesisError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(
            session_id = %self.id,
            from = %self.state,
            to = %next,
            "Session state changed"
        );
        self.state = next;
        Ok(())
    }

    /// 标记失败（已处于终态时不做任何事）
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            let _ = self.advance(SessionState::Failed);
        }
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn encoding(&self) -> &EncodingDescriptor {
        &self.encoding
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 会话已持续的毫秒数
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
