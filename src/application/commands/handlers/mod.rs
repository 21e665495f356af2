//! Command Handlers 实现
//!
//! 解析凭证 → 校验 → 委托远端调用或会话驱动 → 组装结果

mod synthesis_handlers;
mod voice_handlers;

pub use synthesis_handlers::*;
pub use voice_handlers::*;
