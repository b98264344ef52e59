//! HTTP surface: status page, health check and the WebSocket endpoint.

use crate::signaling::{SignalingService, ws_handler};
use axum::Json;
use axum::Router;
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const STATUS_TEXT: &str = "USB Connect signaling server is running.";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Build the relay router. Any origin may connect.
pub fn router(service: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn status_handler() -> &'static str {
    STATUS_TEXT
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
