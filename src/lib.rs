//! VoiceCraft - 通义千问声音定制与实时合成网关
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Synthesis: 实时合成会话状态机、事件、采样率编码表
//! - Voice: 凭证与样本音频值对象
//!
//! 应用层 (application/):
//! - Ports: RealtimeConnector, VoiceCustomization, AudioTranscoder
//! - Synthesis: 会话驱动与事件收集
//! - Commands: 声音设计、声音复刻、语音合成
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: DashScope 客户端（HTTP + WebSocket）、WAV 封装

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
