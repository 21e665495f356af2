//! DashScope Voice Client - 音色创建 HTTP 客户端
//!
//! 实现 VoiceCustomizationPort，声音设计和声音复刻共用同一个接口：
//! POST {http_url}
//! Request: {"model": "...", "input": {"action": "create", ...}, "parameters": {...}}  (JSON)
//! Response: {"output": {"voice": "...", "preview_audio": {"data": "<base64>"}}}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    DesignVoiceRequest, DesignedVoice, EnrollVoiceRequest, VoiceCustomizationError,
    VoiceCustomizationPort,
};
use crate::domain::voice::ApiKey;

const DESIGN_MODEL: &str = "qwen-voice-design";
const ENROLL_MODEL: &str = "qwen-voice-enrollment";
const CREATE_ACTION: &str = "create";

#[derive(Debug, Serialize)]
struct CustomizationRequest<I, P> {
    model: &'static str,
    input: I,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<P>,
}

#[derive(Debug, Serialize)]
struct DesignInput<'a> {
    action: &'static str,
    target_model: &'a str,
    voice_prompt: &'a str,
    preview_text: &'a str,
    preferred_name: &'a str,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct DesignParameters<'a> {
    sample_rate: u32,
    response_format: &'a str,
}

#[derive(Debug, Serialize)]
struct EnrollInput<'a> {
    action: &'static str,
    target_model: &'a str,
    preferred_name: &'a str,
    audio: AudioPayload,
}

#[derive(Debug, Serialize)]
struct AudioPayload {
    /// data URI
    data: String,
}

#[derive(Debug, Deserialize)]
struct CustomizationResponse {
    output: Option<CustomizationOutput>,
}

#[derive(Debug, Deserialize)]
struct CustomizationOutput {
    voice: Option<String>,
    #[serde(default)]
    preview_audio: Option<PreviewAudio>,
}

#[derive(Debug, Deserialize)]
struct PreviewAudio {
    data: Option<String>,
}

/// 音色创建客户端配置
#[derive(Debug, Clone)]
pub struct DashscopeVoiceClientConfig {
    /// 音色创建接口 URL
    pub http_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for DashscopeVoiceClientConfig {
    fn default() -> Self {
        Self {
            http_url: "https://dashscope.aliyuncs.com/api/v1/services/audio/tts/customization"
                .to_string(),
            timeout_secs: 60,
        }
    }
}

/// DashScope 音色创建客户端
pub struct DashscopeVoiceClient {
    client: Client,
    config: DashscopeVoiceClientConfig,
}

impl DashscopeVoiceClient {
    pub fn new(config: DashscopeVoiceClientConfig) -> Result<Self, VoiceCustomizationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VoiceCustomizationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 发送请求并解析 output
    async fn post<B: Serialize>(
        &self,
        api_key: &ApiKey,
        body: &B,
    ) -> Result<CustomizationOutput, VoiceCustomizationError> {
        let response = self
            .client
            .post(&self.config.http_url)
            .bearer_auth(api_key.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VoiceCustomizationError::Timeout
                } else if e.is_connect() {
                    VoiceCustomizationError::NetworkError(format!(
                        "Cannot connect to DashScope: {}",
                        e
                    ))
                } else {
                    VoiceCustomizationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VoiceCustomizationError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(VoiceCustomizationError::ServiceError {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: CustomizationResponse = serde_json::from_str(&text).map_err(|e| {
            VoiceCustomizationError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        parsed
            .output
            .ok_or_else(|| VoiceCustomizationError::InvalidResponse("Missing output".to_string()))
    }
}

fn require_voice(output: &CustomizationOutput) -> Result<String, VoiceCustomizationError> {
    output
        .voice
        .clone()
        .filter(|voice| !voice.is_empty())
        .ok_or_else(|| VoiceCustomizationError::InvalidResponse("Missing output.voice".to_string()))
}

#[async_trait]
impl VoiceCustomizationPort for DashscopeVoiceClient {
    async fn design_voice(
        &self,
        request: DesignVoiceRequest,
    ) -> Result<DesignedVoice, VoiceCustomizationError> {
        let body = CustomizationRequest {
            model: DESIGN_MODEL,
            input: DesignInput {
                action: CREATE_ACTION,
                target_model: &request.target_model,
                voice_prompt: &request.voice_prompt,
                preview_text: &request.preview_text,
                preferred_name: &request.preferred_name,
                language: &request.language,
            },
            parameters: Some(DesignParameters {
                sample_rate: request.sample_rate,
                response_format: &request.response_format,
            }),
        };

        tracing::debug!(
            url = %self.config.http_url,
            target_model = %request.target_model,
            prompt_len = request.voice_prompt.chars().count(),
            "Sending voice design request"
        );

        let output = self.post(&request.api_key, &body).await?;
        let voice = require_voice(&output)?;
        let preview_audio_base64 = output
            .preview_audio
            .and_then(|preview| preview.data)
            .filter(|data| !data.is_empty());

        Ok(DesignedVoice {
            voice,
            preview_audio_base64,
        })
    }

    async fn enroll_voice(
        &self,
        request: EnrollVoiceRequest,
    ) -> Result<String, VoiceCustomizationError> {
        let body: CustomizationRequest<_, ()> = CustomizationRequest {
            model: ENROLL_MODEL,
            input: EnrollInput {
                action: CREATE_ACTION,
                target_model: &request.target_model,
                preferred_name: &request.preferred_name,
                audio: AudioPayload {
                    data: request.sample.to_data_uri(),
                },
            },
            parameters: None,
        };

        tracing::debug!(
            url = %self.config.http_url,
            target_model = %request.target_model,
            audio_size = request.sample.len(),
            "Sending voice enrollment request"
        );

        let output = self.post(&request.api_key, &body).await?;
        require_voice(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::AudioSample;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// 本地模拟服务：记录请求，返回固定状态和响应体
    async fn spawn_service(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let app = Router::new().route(
            "/customization",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    sink.lock().unwrap().push((auth, body));
                    (status, Json(reply))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/customization", addr), captured)
    }

    fn client(url: String) -> DashscopeVoiceClient {
        DashscopeVoiceClient::new(DashscopeVoiceClientConfig {
            http_url: url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn design_request() -> DesignVoiceRequest {
        DesignVoiceRequest {
            api_key: ApiKey::parse("sk-test").unwrap(),
            voice_prompt: "沉稳的男声".to_string(),
            preview_text: "欢迎收听".to_string(),
            preferred_name: "narrator".to_string(),
            language: "zh".to_string(),
            target_model: "qwen3-tts-vd-realtime-2025-12-16".to_string(),
            sample_rate: 24000,
            response_format: "wav".to_string(),
        }
    }

    #[test]
    fn test_config_default() {
        let config = DashscopeVoiceClientConfig::default();
        assert!(config.http_url.ends_with("/tts/customization"));
        assert_eq!(config.timeout_secs, 60);
    }

    #[tokio::test]
    async fn test_design_request_shape() {
        let (url, captured) = spawn_service(
            StatusCode::OK,
            json!({"output": {"voice": "qwen-tts-vd-narrator", "preview_audio": {"data": "UklGRg=="}}}),
        )
        .await;

        let designed = client(url).design_voice(design_request()).await.unwrap();
        assert_eq!(designed.voice, "qwen-tts-vd-narrator");
        assert_eq!(designed.preview_audio_base64.as_deref(), Some("UklGRg=="));

        let captured = captured.lock().unwrap();
        let (auth, body) = &captured[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "qwen-voice-design");
        assert_eq!(body["input"]["action"], "create");
        assert_eq!(body["input"]["voice_prompt"], "沉稳的男声");
        assert_eq!(body["input"]["preferred_name"], "narrator");
        assert_eq!(body["parameters"]["sample_rate"], 24000);
        assert_eq!(body["parameters"]["response_format"], "wav");
    }

    #[tokio::test]
    async fn test_enroll_request_carries_data_uri() {
        let (url, captured) =
            spawn_service(StatusCode::OK, json!({"output": {"voice": "qwen-tts-vc-1"}})).await;

        let voice = client(url)
            .enroll_voice(EnrollVoiceRequest {
                api_key: ApiKey::parse("sk-test").unwrap(),
                sample: AudioSample::new(vec![1, 2, 3], "audio/wav").unwrap(),
                preferred_name: String::new(),
                target_model: "qwen3-tts-vc-realtime-2026-01-15".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(voice, "qwen-tts-vc-1");

        let captured = captured.lock().unwrap();
        let body = &captured[0].1;
        assert_eq!(body["model"], "qwen-voice-enrollment");
        assert_eq!(body["input"]["audio"]["data"], "data:audio/wav;base64,AQID");
        assert!(body.get("parameters").is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_passed_through() {
        let (url, _) = spawn_service(
            StatusCode::BAD_REQUEST,
            json!({"code": "InvalidParameter", "message": "bad prompt"}),
        )
        .await;

        match client(url).design_voice(design_request()).await {
            Err(VoiceCustomizationError::ServiceError { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("InvalidParameter"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_voice_is_invalid_response() {
        let (url, _) = spawn_service(StatusCode::OK, json!({"output": {}})).await;

        assert!(matches!(
            client(url).design_voice(design_request()).await,
            Err(VoiceCustomizationError::InvalidResponse(_))
        ));
    }
}
