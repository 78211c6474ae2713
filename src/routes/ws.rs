use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::ws;
use crate::state::AppState;
use std::sync::Arc;

/// Create the WebSocket router
///
/// The streaming endpoint is unauthenticated; the service is a processing
/// pipeline for ephemeral audio, and access control belongs to the proxy
/// layer in front of it.
pub fn create_ws_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws/transcribe", get(ws::ws_transcribe_handler))
        .layer(TraceLayer::new_for_http())
}
