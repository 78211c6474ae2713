use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::stt::base::Transcriber;

/// Application state that can be shared across handlers
///
/// The transcriber is built once at process start and shared read-only by
/// every session; no handler mutates it.
pub struct AppState {
    pub config: ServerConfig,
    pub transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    pub fn new(config: ServerConfig, transcriber: Arc<dyn Transcriber>) -> Arc<Self> {
        Arc::new(Self {
            config,
            transcriber,
        })
    }
}
