//! TTS HTTP Handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::infrastructure::http::dto::{TtsRequest, TtsResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 文本转语音
///
/// 整段音频合成完成后一次性返回（base64）
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Json<TtsResponse>, ApiError> {
    let Json(req) = payload?;

    let audio = state.synthesize_speech_handler.handle(req.into()).await?;

    tracing::info!(
        mime_type = audio.mime_type(),
        bytes = audio.audio_data.len(),
        duration_ms = audio.duration_ms,
        "Speech synthesized"
    );

    Ok(Json(audio.into()))
}
