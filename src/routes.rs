use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::transcribe_audio;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Both spellings are served directly, no redirect
        .route("/transcribe", post(transcribe_audio))
        .route("/transcribe/", post(transcribe_audio))
}

/// Full application with middleware, ready to serve
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.system_config.max_upload_bytes;

    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Audio Transcription Service" }))
}
