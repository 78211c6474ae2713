//! WebSocket wire messages for the streaming transcription endpoint.

use serde::{Deserialize, Serialize};

use crate::core::session::SessionEvent;

/// JSON control messages accepted from the client.
///
/// Audio itself arrives as binary frames; the only text message is the
/// end-of-stream signal. Sending `stop` lets the server deliver the final
/// transcript before the close handshake, which a bare close frame does
/// not allow.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    #[serde(rename = "stop")]
    Stop,
}

/// JSON messages sent to the client.
///
/// Transcripts carry `is_final=false` for every windowed partial and
/// `is_final=true` exactly once, for the drained tail of a gracefully
/// closed stream.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "transcript")]
    Transcript {
        text: String,
        is_final: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        confidence: Option<f32>,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

impl From<SessionEvent> for OutgoingMessage {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::Transcript {
                text,
                is_final,
                confidence,
            } => OutgoingMessage::Transcript {
                text,
                is_final,
                confidence,
            },
            SessionEvent::Error { message } => OutgoingMessage::Error { message },
        }
    }
}
