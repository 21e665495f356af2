//! Voice HTTP Handlers
//!
//! 声音设计（JSON）与声音复刻（multipart 上传样本）

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use std::sync::Arc;

use crate::application::EnrollVoice;
use crate::infrastructure::http::dto::{DesignVoiceRequest, DesignVoiceResponse, EnrollVoiceResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 声音设计
pub async fn design_voice(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DesignVoiceRequest>, JsonRejection>,
) -> Result<Json<DesignVoiceResponse>, ApiError> {
    let Json(req) = payload?;

    let result = state.design_voice_handler.handle(req.into()).await?;

    Ok(Json(DesignVoiceResponse {
        voice: result.voice,
        preview_audio_base64: result.preview_audio_base64,
        preview_audio_format: result.preview_audio_format,
    }))
}

/// 声音复刻
///
/// 表单字段：`audio`（文件）、`api_key`、`audio_mime_type`、`preferred_name`、`target_model`
pub async fn enroll_voice(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EnrollVoiceResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut command = EnrollVoice::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "audio" => {
                command.upload_content_type = field.content_type().map(|s| s.to_string());
                command.audio = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read audio: {}", e)))?
                        .to_vec(),
                );
            }
            "api_key" => command.api_key = Some(read_text(field, "api_key").await?),
            "audio_mime_type" => {
                command.audio_mime_type = Some(read_text(field, "audio_mime_type").await?)
            }
            "preferred_name" => {
                command.preferred_name = Some(read_text(field, "preferred_name").await?)
            }
            "target_model" => command.target_model = Some(read_text(field, "target_model").await?),
            _ => {}
        }
    }

    let result = state.enroll_voice_handler.handle(command).await?;

    Ok(Json(EnrollVoiceResponse {
        voice: result.voice,
    }))
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))
}
