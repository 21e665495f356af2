//! HTTP Middleware
//!
//! 请求结果日志：按状态码归类，错误响应带上 errno 和原因

use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

use super::error::ErrorContext;

/// 请求结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    /// 参数、凭证或采样率问题
    Rejected,
    /// DashScope 失败、超时或连接中断
    UpstreamFailure,
    Internal,
}

impl RequestOutcome {
    pub fn classify(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => Self::UpstreamFailure,
            s if s.is_server_error() => Self::Internal,
            s if s.is_client_error() => Self::Rejected,
            _ => Self::Success,
        }
    }
}

/// 请求日志中间件
///
/// 4xx 记 WARN，5xx 记 ERROR；用例错误的 errno 和原因从响应扩展中读取
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    let context = response.extensions().get::<ErrorContext>();
    let errno = context.map(|c| c.errno).unwrap_or(i32::from(status.as_u16()));
    let error = context.map(|c| c.message.as_str()).unwrap_or("");

    match RequestOutcome::classify(status) {
        RequestOutcome::Success => {
            tracing::debug!(method = %method, path = %path, status = status.as_u16(), latency_ms, "Request completed");
        }
        RequestOutcome::Rejected => {
            tracing::warn!(method = %method, path = %path, status = status.as_u16(), errno, error, latency_ms, "Request rejected");
        }
        RequestOutcome::UpstreamFailure => {
            tracing::error!(method = %method, path = %path, status = status.as_u16(), errno, error, latency_ms, "DashScope request failed");
        }
        RequestOutcome::Internal => {
            tracing::error!(method = %method, path = %path, status = status.as_u16(), errno, error, latency_ms, "Internal server error");
        }
    }

    response
}
