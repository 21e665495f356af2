//! Ping Handler
//!
//! 健康检查，同时告诉前端是否需要自带凭证以及可选的采样率

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// 为 false 时请求必须携带 api_key
    pub api_key_configured: bool,
    pub sample_rates: Vec<u32>,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_key_configured: state.api_key_configured,
        sample_rates: state.sample_rates.clone(),
    })
}
