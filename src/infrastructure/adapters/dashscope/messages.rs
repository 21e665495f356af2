//! 实时合成线路消息
//!
//! 客户端指令序列化为带 `event_id` 的 JSON 文本帧，服务端事件按 `type` 字段解析

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::synthesis::{ClientCommand, SynthesisEvent};

#[derive(Debug, Serialize)]
struct SessionParams<'a> {
    voice: &'a str,
    response_format: &'a str,
    sample_rate: u32,
    mode: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ClientEvent<'a> {
    #[serde(rename = "session.update")]
    SessionUpdate {
        event_id: String,
        session: SessionParams<'a>,
    },
    #[serde(rename = "input_text_buffer.append")]
    InputTextAppend { event_id: String, text: &'a str },
    #[serde(rename = "session.finish")]
    SessionFinish { event_id: String },
}

fn new_event_id() -> String {
    format!("event_{}", Uuid::new_v4().simple())
}

/// 序列化客户端指令
pub fn encode_command(command: &ClientCommand) -> Result<String, serde_json::Error> {
    let event = match command {
        ClientCommand::UpdateSession {
            voice,
            response_format,
            sample_rate,
            mode,
        } => ClientEvent::SessionUpdate {
            event_id: new_event_id(),
            session: SessionParams {
                voice,
                response_format,
                sample_rate: *sample_rate,
                mode: mode.as_str(),
            },
        },
        ClientCommand::AppendText(text) => ClientEvent::InputTextAppend {
            event_id: new_event_id(),
            text,
        },
        ClientCommand::Finish => ClientEvent::SessionFinish {
            event_id: new_event_id(),
        },
    };
    serde_json::to_string(&event)
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ServerEvent {
    #[serde(rename = "response.audio.delta")]
    AudioDelta { delta: String },
    #[serde(rename = "response.done")]
    ResponseDone {},
    #[serde(rename = "session.finished")]
    SessionFinished {},
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        error: ErrorDetail,
    },
    #[serde(other)]
    Unknown,
}

/// 解析服务端文本帧
pub fn decode_event(text: &str) -> Result<SynthesisEvent, serde_json::Error> {
    let event = match serde_json::from_str::<ServerEvent>(text)? {
        ServerEvent::AudioDelta { delta } => SynthesisEvent::AudioDelta(delta),
        ServerEvent::ResponseDone {} => SynthesisEvent::Done,
        ServerEvent::SessionFinished {} => SynthesisEvent::SessionFinished,
        ServerEvent::Error { error } => SynthesisEvent::ProtocolError(describe_error(error)),
        ServerEvent::Unknown => SynthesisEvent::Other(event_type(text)),
    };
    Ok(event)
}

fn describe_error(error: ErrorDetail) -> String {
    match (error.code, error.message) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (None, Some(message)) => message,
        (Some(code), None) => code,
        (None, None) => "unknown realtime error".to_string(),
    }
}

fn event_type(text: &str) -> String {
    #[derive(Deserialize)]
    struct Tag {
        #[serde(rename = "type")]
        kind: String,
    }
    serde_json::from_str::<Tag>(text)
        .map(|tag| tag.kind)
        .unwrap_or_default()
}
