use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Liveness probe
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "stellarview-site",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness probe
///
/// The site has no upstream dependencies to wait for, so it is ready as soon
/// as it is listening.
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "ready",
        "service": "stellarview-site",
    })))
}
