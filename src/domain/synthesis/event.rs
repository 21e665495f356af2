//! Synthesis Context - 远端推送事件

/// 实时合成连接上推送的单个事件
///
/// 线路格式由适配器负责解析，这里只保留会话关心的语义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// 音频片段（线路上为 base64 编码）
    AudioDelta(String),
    /// 一次响应生成完成
    Done,
    /// 会话结束
    SessionFinished,
    /// 服务端报告的错误
    ProtocolError(String),
    /// 未知或不关心的事件类型
    Other(String),
}

impl SynthesisEvent {
    /// 是否为完成信号
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Done | Self::SessionFinished)
    }
}

/// 发送给实时合成服务的客户端指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// 会话配置
    UpdateSession {
        voice: String,
        response_format: String,
        sample_rate: u32,
        mode: InputMode,
    },
    /// 追加待合成文本
    AppendText(String),
    /// 输入结束
    Finish,
}

/// 文本输入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// 由服务端决定何时开始生成音频
    ServerCommit,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServerCommit => "server_commit",
        }
    }
}
