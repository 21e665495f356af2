//! 实时合成会话
//!
//! - collector: 事件收集器，连接推送方与等待方
//! - driver: 会话驱动，负责连接生命周期

mod collector;
mod driver;

pub use collector::{CompletionOutcome, EventCollector, OutcomeWaiter};
pub use driver::{SessionDriver, SynthesisRequest, DEFAULT_COMPLETION_TIMEOUT};
