//! Voice Context - Value Objects

use base64::prelude::*;

/// 访问凭证
///
/// 不变量: 去除首尾空白后非空
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// 从原始输入构造，空白输入返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Authorization 头取值
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// 凭证不出现在日志里
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

/// 用于音色复刻的样本音频
#[derive(Debug, Clone)]
pub struct AudioSample {
    data: Vec<u8>,
    mime_type: String,
}

impl AudioSample {
    pub const DEFAULT_MIME_TYPE: &'static str = "audio/mpeg";

    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, &'static str> {
        if data.is_empty() {
            return Err("音频文件不能为空");
        }
        let mime_type = mime_type.into();
        let mime_type = match mime_type.trim() {
            "" => Self::DEFAULT_MIME_TYPE.to_string(),
            other => other.to_string(),
        };
        Ok(Self { data, mime_type })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// `data:{mime};base64,{payload}` 形式
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.data)
        )
    }
}
