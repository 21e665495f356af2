//! Synthesis Context - 实时合成限界上下文
//!
//! 职责:
//! - 采样率与音频编码的映射
//! - 合成会话生命周期（状态机）
//! - 远端事件与客户端指令的领域表示

mod encoding;
mod errors;
mod event;
mod session;

pub use encoding::{EncodingDescriptor, EncodingTable, BUILTIN_ENCODINGS};
pub use errors::SynthesisError;
pub use event::{ClientCommand, InputMode, SynthesisEvent};
pub use session::{Session, SessionState};
