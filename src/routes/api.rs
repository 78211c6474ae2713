use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::api;
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health_check))
        .route("/api/transcribe", post(api::transcribe_handler))
        .layer(TraceLayer::new_for_http())
}
