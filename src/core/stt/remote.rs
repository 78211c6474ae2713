//! HTTP wrapper around a model inference server.
//!
//! The model is loaded once by the server process this client points at;
//! this side only ships PCM16 windows over and parses the JSON reply.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::core::audio::decode::f32_to_pcm16_bytes;

use super::base::{ModelError, Transcriber, Transcription};

/// JSON payload returned by the model server.
#[derive(Debug, serde::Deserialize)]
struct TranscriptionPayload {
    text: String,
    confidence: Option<f32>,
}

/// Transcriber backed by a remote model server speaking raw PCM16 over
/// HTTP.
pub struct RemoteTranscriber {
    client: Client,
    endpoint: String,
    model_name: String,
    sample_rate: u32,
}

impl RemoteTranscriber {
    pub fn new(base_url: &str, model_name: &str, sample_rate: u32) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/transcribe", base_url.trim_end_matches('/')),
            model_name: model_name.to_string(),
            sample_rate,
        }
    }
}

#[async_trait]
impl Transcriber for RemoteTranscriber {
    async fn transcribe(
        &self,
        window: &[f32],
        language: Option<&str>,
    ) -> Result<Transcription, ModelError> {
        let pcm = f32_to_pcm16_bytes(window);
        debug!(
            bytes = pcm.len(),
            model = %self.model_name,
            "sending window to model server"
        );

        let mut query: Vec<(&str, String)> = vec![
            ("model", self.model_name.clone()),
            ("sample_rate", self.sample_rate.to_string()),
        ];
        if let Some(language) = language {
            query.push(("language", language.to_string()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&query)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(pcm)
            .send()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::RequestFailed(format!(
                "model server returned {status}"
            )));
        }

        let payload: TranscriptionPayload = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(Transcription::new(payload.text, payload.confidence))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
