use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;

use streamscribe::core::stt::{ModelError, Transcriber, Transcription};
use streamscribe::{routes, state::AppState, AudioSettings, ServerConfig};

struct CountingTranscriber {
    calls: Mutex<usize>,
}

impl CountingTranscriber {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
        })
    }
}

#[async_trait]
impl Transcriber for CountingTranscriber {
    async fn transcribe(
        &self,
        window: &[f32],
        _language: Option<&str>,
    ) -> Result<Transcription, ModelError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(Transcription::new(
            format!("segment {} ({} samples)", *calls, window.len()),
            Some(0.9),
        ))
    }

    fn model_name(&self) -> &str {
        "counting"
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        audio: AudioSettings {
            sample_rate: 10,
            chunk_duration: 1.0,
            overlap_duration: 0.2,
        },
        model_url: "http://127.0.0.1:9".to_string(),
        model_name: "counting".to_string(),
        max_body_bytes: 4096,
    }
}

async fn spawn_server() -> std::net::SocketAddr {
    let app_state = AppState::new(test_config(), CountingTranscriber::new());

    let app = routes::api::create_api_router()
        .merge(routes::ws::create_ws_router())
        .with_state(app_state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    addr
}

#[tokio::test]
async fn test_health_check() {
    let addr = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "counting");
    assert_eq!(body["sample_rate"], 10);
}

#[tokio::test]
async fn test_root_banner_lists_endpoints() {
    let addr = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["service"], "streamscribe");
    assert_eq!(body["endpoints"]["websocket"], "/ws/transcribe");
}

#[tokio::test]
async fn test_one_shot_transcription() {
    let addr = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/transcribe?language=en"))
        .body(vec![0u8; 20]) // 10 linear16 samples
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["text"], "segment 1 (10 samples)");
    assert_eq!(body["language"], "en");
    assert!((body["confidence"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert!(body["duration"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_empty_payload_is_bad_request() {
    let addr = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/transcribe"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_misaligned_payload_is_bad_request() {
    let addr = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/transcribe"))
        .body(vec![0u8; 3])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_oversized_payload_is_rejected() {
    let addr = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/transcribe"))
        .body(vec![0u8; 8192])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 413);
}
