#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// One multipart field the fake classifier received
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct Recorded {
    pub uploads: Mutex<Vec<Upload>>,
    pub rpc_bodies: Mutex<Vec<Value>>,
    pub config_hits: AtomicUsize,
    pub image_hits: AtomicUsize,
}

impl Recorded {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn rpc_bodies(&self) -> Vec<Value> {
        self.rpc_bodies.lock().unwrap().clone()
    }

    pub fn config_hits(&self) -> usize {
        self.config_hits.load(Ordering::SeqCst)
    }

    pub fn image_hits(&self) -> usize {
        self.image_hits.load(Ordering::SeqCst)
    }
}

/// A local stand-in for the remote classifier and an image host
pub struct FakeClassifier {
    pub addr: SocketAddr,
    pub recorded: Arc<Recorded>,
}

impl FakeClassifier {
    pub async fn start() -> Self {
        let recorded = Arc::new(Recorded::default());
        let app = Router::new()
            .route("/ok/api/predict", post(predict_ok))
            .route("/fail/api/predict", post(predict_fail))
            .route("/error/api/predict", post(predict_error_field))
            .route("/garbage/api/predict", post(predict_garbage))
            .route("/images/bus.png", get(image_ok))
            .route("/images/missing.png", get(image_missing))
            .route("/space/config", get(space_config))
            .route("/space/run/predict", post(space_predict))
            .route("/emptyspace/config", get(space_config))
            .route("/emptyspace/run/predict", post(space_predict_empty))
            .route("/downspace/config", get(space_down))
            .route("/plainspace/config", get(space_config_unreadable))
            .route("/plainspace/run/predict", post(space_predict))
            .with_state(Arc::clone(&recorded));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, recorded }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn predict_ok(State(recorded): State<Arc<Recorded>>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let upload = Upload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        recorded.uploads.lock().unwrap().push(upload);
    }
    Json(json!({
        "prediction": "inedible",
        "confidence": 0.42,
        "all_scores": {"inedible": 0.42, "durian": 0.1},
        "will_eat": false
    }))
}

async fn predict_fail() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "model exploded")
}

async fn predict_error_field() -> Json<Value> {
    Json(json!({"error": "Error processing image: cannot identify image file"}))
}

async fn predict_garbage() -> impl IntoResponse {
    (StatusCode::OK, "definitely not json")
}

async fn image_ok(State(recorded): State<Arc<Recorded>>) -> impl IntoResponse {
    recorded.image_hits.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES.to_vec())
}

async fn image_missing() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

async fn space_config(State(recorded): State<Arc<Recorded>>) -> Json<Value> {
    recorded.config_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({"version": "3.50.2", "mode": "interface"}))
}

async fn space_predict(State(recorded): State<Arc<Recorded>>, Json(body): Json<Value>) -> Json<Value> {
    recorded.rpc_bodies.lock().unwrap().push(body);
    Json(json!({
        "data": [{
            "label": "durian",
            "confidences": [
                {"label": "durian", "confidence": 0.87},
                {"label": "other", "confidence": 0.13}
            ]
        }],
        "duration": 0.12
    }))
}

async fn space_predict_empty() -> Json<Value> {
    Json(json!({"data": []}))
}

async fn space_config_unreadable(State(recorded): State<Arc<Recorded>>) -> impl IntoResponse {
    recorded.config_hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, "<html>loading...</html>")
}

async fn space_down() -> impl IntoResponse {
    StatusCode::SERVICE_UNAVAILABLE
}
