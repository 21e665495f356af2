//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod dashscope;
pub mod transcoder;

#[cfg(test)]
pub mod fake;

pub use dashscope::*;
pub use transcoder::*;
