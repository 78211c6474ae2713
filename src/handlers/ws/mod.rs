//! # WebSocket Streaming Transcription Module
//!
//! This module provides the WebSocket interface for real-time speech-to-text
//! over a persistent connection.
//!
//! ## WebSocket API
//!
//! ### Connection Flow
//! 1. Client connects to `/ws/transcribe`, passing the audio format as query
//!    parameters (`language`, `encoding`, `channels`)
//! 2. Client streams raw PCM audio as binary messages
//! 3. Server emits a partial transcript whenever a full window of audio has
//!    accumulated
//! 4. Client sends `{"type": "stop"}`; the server transcribes the leftover
//!    tail, emits it as the final message, and closes the connection
//!
//! A plain close frame (or clean EOF) also runs the drain, but the WebSocket
//! close handshake forbids data frames after the client's close, so a final
//! transcript produced that way cannot be delivered. Clients that want the
//! tail must send `stop`. An abnormal transport error discards the tail.
//!
//! ### Message Types
//!
//! **Incoming:**
//! - **Binary messages** - Raw PCM audio fragments (any size, any alignment
//!   to window boundaries)
//! - `{"type": "stop"}` - end of stream; request the final transcript
//!
//! **Outgoing:**
//! - `{"type": "transcript", "text": "...", "is_final": false, "confidence": 0.95}` -
//!   partial result for one window; later partials supersede earlier ones
//! - `{"type": "transcript", "text": "...", "is_final": true}` - final result
//!   for the drained tail, always the last message of the session
//! - `{"type": "error", "message": "..."}` - inline error for one fragment or
//!   window; the stream keeps running
//!
//! ## Connection Parameters
//!
//! - `language`: optional language hint forwarded to the model (e.g. `?language=ko`)
//! - `encoding`: `linear16` (default) or `float32`
//! - `channels`: channel count of the incoming PCM, downmixed to mono (default 1)
//!
//! Fragments must already be at the configured sample rate; resampling and
//! container decoding happen upstream of this service.

pub mod handler;
pub mod messages;

// Re-export commonly used items
pub use handler::{ws_transcribe_handler, StreamParams};
pub use messages::{IncomingMessage, OutgoingMessage};
