//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Synthesis Context: 实时语音合成会话
//! - Voice Context: 音色创建

pub mod synthesis;
pub mod voice;
