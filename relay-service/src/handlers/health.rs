use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "relay-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe. The service has no dependencies to wait on.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
