//! HTTP Error Handling

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求本身有问题
    BadRequest(String),
    /// 远端服务失败
    BadGateway(String),
    /// 流式连接失败或超时
    GatewayTimeout(String),
    Internal(String),
}

/// 附在错误响应扩展里，由日志中间件统一记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub errno: i32,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn errno(&self) -> i32 {
        match self {
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::BadGateway(_) => errno::BAD_GATEWAY,
            ApiError::GatewayTimeout(_) => errno::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errno = self.errno();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::BadGateway(msg)
            | ApiError::GatewayTimeout(msg)
            | ApiError::Internal(msg) => msg,
        };

        let context = ErrorContext {
            errno,
            message: message.clone(),
        };
        let mut response = (status, Json(ErrorResponse::new(errno, message))).into_response();
        response.extensions_mut().insert(context);
        response
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::CredentialError(msg) => ApiError::BadRequest(msg),
            e @ ApplicationError::UnsupportedSampleRate(_) => ApiError::BadRequest(e.to_string()),
            e @ (ApplicationError::RemoteCallError { .. }
            | ApplicationError::RemoteSynthesisError(_)
            | ApplicationError::EmptyResult) => ApiError::BadGateway(e.to_string()),
            e @ ApplicationError::TransportError(_) => ApiError::GatewayTimeout(e.to_string()),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", e.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}
