//! Synthesis Context - Errors

use thiserror::Error;

use super::SessionState;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("不支持的采样率 {0}，请在编码表中补充对应的编码")]
    UnsupportedSampleRate(u32),

    #[error("传输错误: {0}")]
    Transport(String),

    #[error("远端合成失败: {0}")]
    RemoteSynthesis(String),

    #[error("实时合成未返回任何音频数据")]
    EmptyResult,

    #[error("非法的会话状态转换: {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}
