//! Axum WebSocket handler for streaming transcription.
//!
//! One socket maps to one `StreamingSession`. Fragments are processed
//! strictly in arrival order and the next frame is not read until the
//! current fragment's windows have been transcribed, so a slow model call
//! stalls the read loop and WebSocket/TCP flow control throttles the
//! sender.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::core::audio::decode::{PcmDecoder, PcmEncoding};
use crate::core::session::StreamingSession;
use crate::state::AppState;

use super::messages::{IncomingMessage, OutgoingMessage};

/// Buffer size for the outgoing message channel
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Connection parameters supplied as query string at upgrade time.
#[derive(Debug, serde::Deserialize)]
pub struct StreamParams {
    /// Optional language hint, immutable for the session
    pub language: Option<String>,
    #[serde(default)]
    pub encoding: PcmEncoding,
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_channels() -> u16 {
    1
}

/// WebSocket streaming transcription handler
/// Upgrades the HTTP connection to WebSocket for real-time transcription
pub async fn ws_transcribe_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<StreamParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("WebSocket transcription connection upgrade requested");
    ws.on_upgrade(move |socket| handle_transcribe_socket(socket, state, params))
}

/// Handle one WebSocket transcription connection end to end.
async fn handle_transcribe_socket(
    socket: WebSocket,
    app_state: Arc<AppState>,
    params: StreamParams,
) {
    info!("WebSocket transcription connection established");

    let (mut sender, mut receiver) = socket.split();

    let (message_tx, mut message_rx) = mpsc::channel::<OutgoingMessage>(CHANNEL_BUFFER_SIZE);

    // Outgoing messages are funneled through one channel, so emission
    // order on the wire is exactly the order events were produced.
    let sender_task = tokio::spawn(async move {
        while let Some(message) = message_rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if let Err(e) = sender.send(Message::Text(json.into())).await {
                        debug!("failed to send WebSocket message: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    error!("failed to serialize outgoing message: {}", e);
                }
            }
        }
        let _ = sender.close().await;
    });

    let decoder = match PcmDecoder::new(params.encoding, params.channels) {
        Ok(decoder) => decoder,
        Err(e) => {
            error!("rejecting connection: {}", e);
            let _ = message_tx
                .send(OutgoingMessage::Error {
                    message: e.to_string(),
                })
                .await;
            drop(message_tx);
            let _ = sender_task.await;
            return;
        }
    };

    let mut session = match StreamingSession::new(
        &app_state.config.audio,
        decoder,
        app_state.transcriber.clone(),
        params.language,
    ) {
        Ok(session) => session,
        Err(e) => {
            error!("rejecting connection: {}", e);
            let _ = message_tx
                .send(OutgoingMessage::Error {
                    message: e.to_string(),
                })
                .await;
            drop(message_tx);
            let _ = sender_task.await;
            return;
        }
    };

    // a clean close (close frame or clean EOF) drains the buffer; a
    // transport error discards it
    let mut graceful = true;

    while let Some(msg_result) = receiver.next().await {
        match msg_result {
            Ok(Message::Binary(data)) => {
                debug!("received audio fragment: {} bytes", data.len());
                for event in session.on_fragment(&data).await {
                    let _ = message_tx.send(event.into()).await;
                }
            }
            Ok(Message::Text(text)) => match serde_json::from_str(text.as_str()) {
                Ok(IncomingMessage::Stop) => {
                    // end-of-stream signalled while the socket can still
                    // deliver the final transcript
                    info!("stop command received");
                    break;
                }
                Err(e) => {
                    let _ = message_tx
                        .send(OutgoingMessage::Error {
                            message: format!("Invalid message format: {e}"),
                        })
                        .await;
                }
            },
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // handled by axum
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket connection closed by client");
                break;
            }
            Err(e) => {
                warn!("WebSocket error: {}", e);
                graceful = false;
                break;
            }
        }
    }

    if graceful {
        for event in session.finish().await {
            let _ = message_tx.send(event.into()).await;
        }
    } else {
        session.abort();
    }

    // dropping the sender closes the channel once queued messages flush
    drop(message_tx);
    let _ = sender_task.await;

    info!("WebSocket transcription connection terminated");
}
