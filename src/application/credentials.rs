//! 访问凭证解析
//!
//! 进程级配置的凭证非空时总是优先，其次才使用请求里携带的凭证

use crate::application::error::ApplicationError;
use crate::domain::voice::ApiKey;

/// 凭证解析器
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    configured: Option<ApiKey>,
}

impl CredentialResolver {
    /// `configured` 为空白时视为未配置
    pub fn new(configured: Option<&str>) -> Self {
        Self {
            configured: configured.and_then(ApiKey::parse),
        }
    }

    pub fn has_configured_key(&self) -> bool {
        self.configured.is_some()
    }

    /// 解析本次请求使用的凭证
    pub fn resolve(&self, inbound: Option<&str>) -> Result<ApiKey, ApplicationError> {
        if let Some(key) = &self.configured {
            return Ok(key.clone());
        }
        inbound.and_then(ApiKey::parse).ok_or_else(|| {
            ApplicationError::credential(
                "Missing API key: configure dashscope.api_key or provide api_key in the request",
            )
        })
    }
}
