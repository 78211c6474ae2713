use std::env;

/// Errors raised while loading or validating configuration.
///
/// Audio parameter validation is fatal: a session is never constructed on
/// top of an invalid window geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("sample rate must be positive")]
    InvalidSampleRate,
    #[error("chunk duration must yield at least one sample per window")]
    InvalidChunkDuration,
    #[error("overlap duration must be non-negative")]
    NegativeOverlap,
    #[error("overlap ({overlap_size} samples) must be shorter than the window ({window_size} samples)")]
    OverlapExceedsWindow {
        overlap_size: usize,
        window_size: usize,
    },
}

/// Audio geometry shared by the buffer and every streaming session.
///
/// Clients negotiate in seconds; the core operates on sample counts derived
/// at the configured sample rate.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AudioSettings {
    /// Sample rate of the canonical sample stream in Hz
    pub sample_rate: u32,
    /// Duration of each transcription window in seconds
    pub chunk_duration: f32,
    /// Overlap carried between consecutive windows in seconds
    pub overlap_duration: f32,
}

impl AudioSettings {
    /// Number of samples per transcription window.
    pub fn window_size(&self) -> usize {
        (f64::from(self.chunk_duration) * f64::from(self.sample_rate)) as usize
    }

    /// Number of trailing samples re-inserted after each window extraction.
    pub fn overlap_size(&self) -> usize {
        (f64::from(self.overlap_duration) * f64::from(self.sample_rate)) as usize
    }

    /// Validate the window geometry. Must hold before any buffer is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if self.chunk_duration <= 0.0 || self.window_size() == 0 {
            return Err(ConfigError::InvalidChunkDuration);
        }
        if self.overlap_duration < 0.0 {
            return Err(ConfigError::NegativeOverlap);
        }
        if self.overlap_size() >= self.window_size() {
            return Err(ConfigError::OverlapExceedsWindow {
                overlap_size: self.overlap_size(),
                window_size: self.window_size(),
            });
        }
        Ok(())
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            chunk_duration: 3.0,
            overlap_duration: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Windowing geometry for streaming transcription
    pub audio: AudioSettings,

    /// Base URL of the model server the transcriber wraps
    pub model_url: String,
    /// Model name reported by the health endpoint and request logs
    pub model_name: String,

    /// Upper bound for one-shot transcription request bodies, in bytes
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("PORT", "8001")?;

        let audio = AudioSettings {
            sample_rate: parse_env("SAMPLE_RATE", "16000")?,
            chunk_duration: parse_env("CHUNK_DURATION", "3.0")?,
            overlap_duration: parse_env("OVERLAP_DURATION", "0.5")?,
        };
        audio.validate()?;

        let model_url =
            env::var("MODEL_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".to_string());
        let model_name = env::var("MODEL_NAME").unwrap_or_else(|_| "whisper-base".to_string());

        let max_body_bytes = parse_env("MAX_BODY_BYTES", "104857600")?; // 100MB

        Ok(ServerConfig {
            host,
            port,
            audio,
            model_url,
            model_name,
            max_body_bytes,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|_| ConfigError::InvalidEnv { name, value: raw })
}
