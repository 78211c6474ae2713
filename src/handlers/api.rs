//! REST handlers: service banner, health check, one-shot transcription.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::core::audio::decode::{PcmDecoder, PcmEncoding};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for one-shot transcription.
#[derive(Debug, serde::Deserialize)]
pub struct TranscribeParams {
    pub language: Option<String>,
    #[serde(default)]
    pub encoding: PcmEncoding,
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_channels() -> u16 {
    1
}

/// One-shot transcription response.
#[derive(Debug, serde::Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
    /// Processing duration in seconds
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Root endpoint: service banner with the endpoint map
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": "streamscribe",
        "model": state.transcriber.model_name(),
        "endpoints": {
            "health": "/health",
            "transcribe": "/api/transcribe",
            "websocket": "/ws/transcribe"
        }
    }))
}

/// Health check handler
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.transcriber.model_name(),
        "sample_rate": state.config.audio.sample_rate
    }))
}

/// Transcribe one raw PCM payload in a single request.
///
/// The body is the full audio clip in the declared encoding; no windowing
/// is applied here.
pub async fn transcribe_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TranscribeParams>,
    body: Bytes,
) -> AppResult<Json<TranscriptionResponse>> {
    let started = Instant::now();

    if body.is_empty() {
        return Err(AppError::BadRequest("empty audio payload".to_string()));
    }
    if body.len() > state.config.max_body_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds limit of {}",
            body.len(),
            state.config.max_body_bytes
        )));
    }

    let decoder = PcmDecoder::new(params.encoding, params.channels)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let samples = decoder
        .decode(&body)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = state
        .transcriber
        .transcribe(&samples, params.language.as_deref())
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let duration = started.elapsed().as_secs_f64();
    info!(
        samples = samples.len(),
        duration_secs = duration,
        "one-shot transcription completed"
    );

    Ok(Json(TranscriptionResponse {
        text: result.text,
        duration,
        language: params.language,
        confidence: result.confidence,
    }))
}
