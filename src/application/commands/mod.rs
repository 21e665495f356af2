//! 应用层 - 命令
//!
//! 三个对外操作：声音设计、声音复刻、语音合成

mod synthesis_commands;
mod voice_commands;

pub mod handlers;

pub use synthesis_commands::*;
pub use voice_commands::*;
