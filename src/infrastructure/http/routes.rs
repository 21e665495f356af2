//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping          GET   健康检查
//! - /api/design-voice  POST  声音设计（JSON）
//! - /api/enroll-voice  POST  声音复刻（multipart）
//! - /api/tts           POST  文本转语音（JSON）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/design-voice", post(handlers::design_voice))
        .route("/enroll-voice", post(handlers::enroll_voice))
        .route("/tts", post(handlers::synthesize))
}
