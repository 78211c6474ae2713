use async_trait::async_trait;

/// Result of transcribing one window of audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    /// The transcribed text for the window
    pub text: String,
    /// Confidence score of the transcription (0.0 to 1.0), when the model
    /// reports one
    pub confidence: Option<f32>,
}

impl Transcription {
    pub fn new(text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
        }
    }
}

/// Errors raised by a transcription backend.
///
/// Any of these is non-fatal for a streaming session: the failed window is
/// reported inline and the stream continues.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    RequestFailed(String),
    #[error("model returned malformed output: {0}")]
    InvalidResponse(String),
}

/// A transcription backend consuming fixed-size windows of canonical
/// samples.
///
/// Implementations are constructed once at process start and shared
/// read-only across sessions; they must not hold per-session state.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one window of mono f32 samples.
    ///
    /// The window may be shorter than a full window when it is the drained
    /// tail of a terminating stream.
    async fn transcribe(
        &self,
        window: &[f32],
        language: Option<&str>,
    ) -> Result<Transcription, ModelError>;

    /// Name of the underlying model, for health reporting and logs.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcription_confidence_clamping() {
        let t = Transcription::new("hello", Some(1.5));
        assert_eq!(t.confidence, Some(1.0));

        let t = Transcription::new("hello", Some(-0.5));
        assert_eq!(t.confidence, Some(0.0));

        let t = Transcription::new("hello", None);
        assert_eq!(t.confidence, None);
    }
}
