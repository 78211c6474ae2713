//! Per-connection streaming transcription session.
//!
//! A session owns one windowing buffer for the lifetime of one
//! connection and drives the fragment -> window -> transcription pipeline
//! strictly sequentially: a fragment is fully decoded, appended, and
//! drained of ready windows before the next fragment is accepted. That
//! ordering is what makes partial results arrive in audio-chronological
//! order, and it lets transport-level flow control throttle a fast sender
//! when transcription is slow.
//!
//! Decode and model failures are reported as inline error events and never
//! end the session; only transport closure does.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AudioSettings, ConfigError};
use crate::core::audio::buffer::StreamingBuffer;
use crate::core::audio::decode::PcmDecoder;
use crate::core::stt::base::Transcriber;

/// Lifecycle of a streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting fragments and emitting partial results
    Receiving,
    /// Stream end signalled; flushing the leftover tail
    Draining,
    /// Terminal. No further input is accepted.
    Closed,
}

/// Events produced by a session, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Transcript {
        text: String,
        is_final: bool,
        confidence: Option<f32>,
    },
    Error {
        message: String,
    },
}

/// Streaming transcription session state machine.
pub struct StreamingSession {
    id: Uuid,
    buffer: StreamingBuffer,
    decoder: PcmDecoder,
    transcriber: Arc<dyn Transcriber>,
    language: Option<String>,
    state: SessionState,
}

impl StreamingSession {
    /// Build a session for one connection.
    ///
    /// Fails only on invalid window geometry; a failed construction means
    /// the connection is refused before any audio is accepted.
    pub fn new(
        settings: &AudioSettings,
        decoder: PcmDecoder,
        transcriber: Arc<dyn Transcriber>,
        language: Option<String>,
    ) -> Result<Self, ConfigError> {
        let buffer = StreamingBuffer::new(settings)?;
        let id = Uuid::new_v4();
        info!(
            session = %id,
            window = buffer.window_size(),
            overlap = buffer.overlap_size(),
            language = language.as_deref().unwrap_or("auto"),
            "streaming session started"
        );
        Ok(Self {
            id,
            buffer,
            decoder,
            transcriber,
            language,
            state: SessionState::Receiving,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Process one raw audio fragment.
    ///
    /// Returns the events to emit, in order: one partial transcript per
    /// window completed by this fragment, with inline errors for decode or
    /// model failures. Fragments arriving after the session left
    /// `Receiving` are ignored.
    pub async fn on_fragment(&mut self, data: &[u8]) -> Vec<SessionEvent> {
        if self.state != SessionState::Receiving {
            debug!(session = %self.id, "fragment ignored, session no longer receiving");
            return Vec::new();
        }

        let samples = match self.decoder.decode(data) {
            Ok(samples) => samples,
            Err(e) => {
                warn!(session = %self.id, error = %e, "dropping undecodable fragment");
                return vec![SessionEvent::Error {
                    message: e.to_string(),
                }];
            }
        };
        self.buffer.append(&samples);

        let mut events = Vec::new();
        while let Some(window) = self.buffer.extract_window(true) {
            match self
                .transcriber
                .transcribe(&window, self.language.as_deref())
                .await
            {
                Ok(result) => {
                    debug!(
                        session = %self.id,
                        chars = result.text.len(),
                        "partial transcript"
                    );
                    events.push(SessionEvent::Transcript {
                        text: result.text,
                        is_final: false,
                        confidence: result.confidence,
                    });
                }
                Err(e) => {
                    // one bad window never aborts the stream
                    warn!(session = %self.id, error = %e, "window transcription failed");
                    events.push(SessionEvent::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
        events
    }

    /// Gracefully end the session: drain the leftover tail and emit the
    /// final result, if any.
    ///
    /// Safe to call more than once; after the first call the buffer is
    /// empty and nothing further is emitted.
    pub async fn finish(&mut self) -> Vec<SessionEvent> {
        if self.state == SessionState::Closed {
            return Vec::new();
        }
        self.state = SessionState::Draining;

        let mut events = Vec::new();
        if let Some(remaining) = self.buffer.drain_remaining() {
            debug!(
                session = %self.id,
                samples = remaining.len(),
                "draining remaining audio"
            );
            match self
                .transcriber
                .transcribe(&remaining, self.language.as_deref())
                .await
            {
                Ok(result) => events.push(SessionEvent::Transcript {
                    text: result.text,
                    is_final: true,
                    confidence: result.confidence,
                }),
                Err(e) => {
                    warn!(session = %self.id, error = %e, "final transcription failed");
                    events.push(SessionEvent::Error {
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            session = %self.id,
            total_audio_secs = self.buffer.total_duration(),
            "streaming session finished"
        );
        self.state = SessionState::Closed;
        events
    }

    /// Abort the session after an abnormal transport failure.
    ///
    /// Undrained samples are discarded; no final result is produced.
    pub fn abort(&mut self) {
        if self.state != SessionState::Closed {
            info!(
                session = %self.id,
                discarded = self.buffer.len(),
                total_audio_secs = self.buffer.total_duration(),
                "streaming session aborted"
            );
        }
        self.buffer.clear();
        self.state = SessionState::Closed;
    }
}
