use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use streamscribe::{
    core::stt::{RemoteTranscriber, Transcriber},
    routes,
    state::AppState,
    ServerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration; invalid window geometry refuses to start
    let config = ServerConfig::from_env()?;
    let address = config.address();
    println!("Starting server on {address}");

    // The model handle is built once here and shared read-only by every
    // session
    let transcriber: Arc<dyn Transcriber> = Arc::new(RemoteTranscriber::new(
        &config.model_url,
        &config.model_name,
        config.audio.sample_rate,
    ));

    // Create application state
    let app_state = AppState::new(config, transcriber);

    // Combine all routes: REST + websocket
    let app = routes::api::create_api_router()
        .merge(routes::ws::create_ws_router())
        .layer(DefaultBodyLimit::max(app_state.config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Create listener
    let listener = TcpListener::bind(&address).await?;

    println!("Server listening on {address}");

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
